//! Ballista Effects - the twelve stereo processors built on ballista-core.
//!
//! Dynamics:
//!
//! - [`Compressor`] - Feed-forward compressor with soft knee, sidechain HPF and mix
//! - [`Gate`] - Downward expander / gate with hold
//! - [`Limiter`] - Instant-attack brickwall limiter
//! - [`Clipper`] - Hard clipper with auto-gain
//! - [`Deesser`] - Split-band de-esser
//! - [`Multiband`] - Four-band compressor on a phase-compensated LR4 split
//!
//! Filters and utility:
//!
//! - [`Equalizer`] - HPF, shelves, two bells, LPF
//! - [`TiltEq`] - Opposing shelves around a pivot
//! - [`Gain`] - Gain, pan, width, polarity, mute
//!
//! Colour and time:
//!
//! - [`Distortion`] - Waveshaper between tone filters
//! - [`Delay`] - Stereo feedback delay with drive and chorus
//! - [`Reverb`] - Freeverb tank with predelay and chorus
//!
//! Every processor implements [`ballista_core::Processor`]. Each module also
//! exports its control table as `PARAMS` and a typed settings struct with
//! `from_controls`, for callers that want to skip the string lookup.
//!
//! ## Example
//!
//! ```rust
//! use ballista_core::{ParamStore, ProcessSpec, Processor, StereoBlock};
//! use ballista_effects::{Compressor, compressor};
//!
//! let store = ParamStore::new(&compressor::PARAMS);
//! store.set("threshold", -30.0);
//!
//! let mut comp = Compressor::new();
//! comp.prepare(ProcessSpec::stereo(48000.0, 256));
//!
//! let mut left = [0.5_f32; 256];
//! let mut right = [0.5_f32; 256];
//! comp.process(&store, StereoBlock::new(&mut left, &mut right));
//! assert!(comp.meters()[0] > 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod clipper;
pub mod compressor;
pub mod deesser;
pub mod delay;
pub mod distortion;
pub mod equalizer;
pub mod gain;
pub mod gate;
pub mod limiter;
pub mod multiband;
pub mod reverb;
pub mod tilt_eq;

pub use clipper::{Clipper, ClipperParams};
pub use compressor::{Compressor, CompressorParams};
pub use deesser::{Deesser, DeesserParams};
pub use delay::{Delay, DelayParams};
pub use distortion::{Distortion, DistortionParams};
pub use equalizer::{Equalizer, EqualizerParams};
pub use gain::{Gain, GainParams};
pub use gate::{Gate, GateParams};
pub use limiter::{Limiter, LimiterParams};
pub use multiband::{BandSplitter, Multiband, MultibandParams};
pub use reverb::{Reverb, ReverbParams};
pub use tilt_eq::{TiltEq, TiltEqParams};
