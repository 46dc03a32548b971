//! Integration tests for ballista-io WAV I/O and offline rendering.

use ballista_core::{ProcessSpec, Processor, db_to_linear};
use ballista_effects::Gain;
use ballista_io::{Error, StereoSamples, WavSpec, read_wav, read_wav_info, write_wav};
use hound::{SampleFormat, WavWriter};
use tempfile::{NamedTempFile, tempdir};

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

#[test]
fn wav_roundtrip_stereo_f32_rates() {
    for sr in [44100, 48000, 96000] {
        let samples = StereoSamples::new(
            sine_wave(sr, 440.0, sr as usize / 10),
            sine_wave(sr, 660.0, sr as usize / 10),
        );
        let spec = WavSpec {
            sample_rate: sr,
            bits_per_sample: 32,
        };

        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, sr);
        assert_eq!(loaded.len(), samples.len());
        assert_eq!(loaded.right, samples.right);
    }
}

#[test]
fn multichannel_file_uses_first_two_channels() {
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 4,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(file.path(), spec).unwrap();
    for frame in 0..10_i16 {
        for ch in 0..4_i16 {
            writer.write_sample((ch + 1) * 1000 + frame).unwrap();
        }
    }
    writer.finalize().unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 4);
    assert_eq!(info.num_frames, 10);

    let (stereo, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec.bits_per_sample, 16);
    assert_eq!(stereo.len(), 10);
    assert!((stereo.left[3] - 1003.0 / 32768.0).abs() < 1e-7);
    assert!((stereo.right[3] - 2003.0 / 32768.0).abs() < 1e-7);
}

#[test]
fn offline_render_through_processor() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");

    let input = StereoSamples::from_mono(sine_wave(48000, 1000.0, 4800));
    write_wav(&input_path, &input, WavSpec::default()).unwrap();

    let (mut samples, spec) = read_wav(&input_path).unwrap();
    let mut gain = Gain::new();
    gain.prepare(ProcessSpec::stereo(f64::from(spec.sample_rate), 256));
    let controls = [("gain", -6.0_f32)];
    for block in samples.blocks_mut(256) {
        gain.process(&controls, block);
    }
    write_wav(&output_path, &samples, spec).unwrap();

    let (rendered, _) = read_wav(&output_path).unwrap();
    let expected = input.peak() * db_to_linear(-6.0);
    assert!((rendered.peak() - expected).abs() < 1e-5);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = read_wav(dir.path().join("nope.wav")).unwrap_err();
    assert!(matches!(err, Error::Wav(_) | Error::Io(_)));
}
