//! Audio file I/O for offline ballista rendering.
//!
//! The processors work on stereo blocks, so this crate reads every WAV file
//! as [`StereoSamples`] and writes stereo back out:
//!
//! - [`read_wav`] / [`write_wav`] load and save audio
//! - [`read_wav_info`] reads the header only
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ballista_core::{Defaults, ProcessSpec, Processor};
//! use ballista_effects::Reverb;
//! use ballista_io::{read_wav, write_wav};
//!
//! let (mut samples, spec) = read_wav("input.wav")?;
//!
//! let mut reverb = Reverb::new();
//! reverb.prepare(ProcessSpec::stereo(f64::from(spec.sample_rate), 512));
//! for block in samples.blocks_mut(512) {
//!     reverb.process(&Defaults, block);
//! }
//!
//! write_wav("output.wav", &samples, spec)?;
//! ```

mod wav;

pub use ballista_core::StereoSamples;
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
