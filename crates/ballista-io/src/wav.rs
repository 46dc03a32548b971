//! WAV file reading and writing.

use crate::{Error, Result};
use ballista_core::StereoSamples;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        }
    }
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: spec.sample_format.into(),
    })
}

/// Sample rate and bit depth of a written file.
///
/// Files are always written as stereo; 16 and 24 bits are integer PCM, 32 bits
/// is float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl WavSpec {
    fn to_hound(self) -> Result<hound::WavSpec> {
        let sample_format = match self.bits_per_sample {
            16 | 24 => SampleFormat::Int,
            32 => SampleFormat::Float,
            bits => {
                return Err(Error::UnsupportedFormat(format!(
                    "{bits}-bit output (use 16, 24 or 32)"
                )));
            }
        };
        Ok(hound::WavSpec {
            channels: 2,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format,
        })
    }
}

fn collect_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(Error::UnsupportedFormat(format!(
                    "{}-bit float",
                    spec.bits_per_sample
                )));
            }
            reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Read a WAV file as stereo samples in `[-1, 1]`, along with its spec.
///
/// Mono files are duplicated to both channels. Files with more than two
/// channels use the first two. The returned spec keeps the file's bit depth
/// so the result can be written back in the same format.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let header = reader.spec();
    let channels = usize::from(header.channels);
    let all_samples = collect_samples(reader)?;

    let stereo = match channels {
        0 => return Err(Error::UnsupportedFormat(String::from("zero channels"))),
        1 => StereoSamples::from_mono(all_samples),
        2 => StereoSamples::from_interleaved(&all_samples),
        _ => {
            let frames = all_samples.len() / channels;
            let mut left = Vec::with_capacity(frames);
            let mut right = Vec::with_capacity(frames);
            for frame in all_samples.chunks_exact(channels) {
                left.push(frame[0]);
                right.push(frame[1]);
            }
            StereoSamples::new(left, right)
        }
    };

    tracing::debug!(
        path = %path.display(),
        channels,
        sample_rate = header.sample_rate,
        frames = stereo.len(),
        "read wav"
    );

    let bits_per_sample = match header.sample_format {
        SampleFormat::Int if header.bits_per_sample <= 16 => 16,
        SampleFormat::Int if header.bits_per_sample <= 24 => 24,
        _ => 32,
    };
    Ok((
        stereo,
        WavSpec {
            sample_rate: header.sample_rate,
            bits_per_sample,
        },
    ))
}

/// Write stereo samples to a WAV file.
///
/// Integer formats clamp out-of-range samples; float output is written as is.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &StereoSamples, spec: WavSpec) -> Result<()> {
    let path = path.as_ref();
    let hound_spec = spec.to_hound()?;
    let mut writer = WavWriter::create(path, hound_spec)?;

    if hound_spec.sample_format == SampleFormat::Float {
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        let quantize = |x: f32| (x * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(quantize(*l))?;
            writer.write_sample(quantize(*r))?;
        }
    }

    writer.finalize()?;
    tracing::debug!(path = %path.display(), frames = samples.len(), bits = spec.bits_per_sample, "wrote wav");
    Ok(())
}
