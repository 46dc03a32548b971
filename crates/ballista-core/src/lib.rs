//! Ballista Core - shared DSP engines for the ballista effect suite
//!
//! Every ballista effect is assembled from the same handful of engines so that
//! a compressor and a de-esser, or an equalizer and a tilt EQ, behave
//! identically where they overlap.
//!
//! # Core Abstractions
//!
//! ## Processors
//!
//! - [`Processor`] - Object-safe block processor with `prepare`/`process`/`reset`
//! - [`ProcessSpec`] - Sample rate and maximum block size handed to `prepare`
//! - [`StereoBlock`] - The host's block, processed in place
//! - [`ControlSurface`] / [`ParamStore`] - String-keyed controls, read once per block
//! - [`ParamDescriptor`] - Names, ranges and defaults of a processor's controls
//! - [`ReductionMeter`] - Per-block gain-reduction readout
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] / [`StereoEnvelope`] - Peak followers with attack/release
//! - [`HoldEnvelope`] - Gate envelope with a hold stage
//! - [`gain_curve`] - Static compressor, gate, limiter and clipper curves
//!
//! ## Filters
//!
//! - [`Biquad`] / [`BiquadCoefficients`] - Direct-form I biquad, RBJ designs in f64
//! - [`FilterDesign`] / [`FilterPipeline`] - Declarative filter stages
//! - [`butterworth_designs`] - 12/24/36 dB per octave cascades
//! - [`LinkwitzRiley`] / [`LrAllpass`] - LR4 crossovers and phase compensation
//! - [`validate_crossovers`] - Keeps three crossover points ordered
//!
//! ## Time-based
//!
//! - [`DelayBuffer`] - Block circular delay with feedback
//! - [`InterpolatedDelay`] / [`Chorus`] - Modulated delay lines
//! - [`Lfo`] - Sine oscillator
//! - [`CombFilter`] / [`AllpassFilter`] - Reverb tank building blocks
//!
//! ## Utilities
//!
//! - [`db_to_linear`], [`linear_to_db`], [`time_constant`], [`equal_power_gains`]
//! - [`WaveShape`] - Saturation curves
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! ballista-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Real-time rules
//!
//! `prepare` may allocate. `process` and `reset` never allocate, lock, log or
//! fail; bad control values are clamped and non-finite state is flushed.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod buffer;
pub mod chorus;
pub mod control;
pub mod crossover;
pub mod delay;
pub mod envelope;
pub mod filter;
pub mod gain_curve;
pub mod lfo;
pub mod math;
pub mod mix;
pub mod param_info;
pub mod processor;
pub mod reverb_tank;
pub mod waveshape;

pub use biquad::{Biquad, BiquadCoefficients, BiquadState};
pub use buffer::{StereoBlock, StereoBuffer, StereoSamples};
pub use chorus::Chorus;
pub use control::{ControlSurface, Defaults, ParamStore};
pub use crossover::{
    Crossover, CrossoverFrequencies, HIGH_MID_RATIO, LOW_MID_RATIO, LinkwitzRiley, LrAllpass,
    validate_crossovers,
};
pub use delay::{DelayBuffer, InterpolatedDelay, Interpolation};
pub use envelope::{Ballistics, EnvelopeFollower, HoldEnvelope, StereoEnvelope, StereoLink};
pub use filter::{
    BUTTERWORTH_Q, ButterworthSlope, FilterDesign, FilterPipeline, FilterStage, PassKind,
    butterworth_designs, butterworth_q,
};
pub use gain_curve::{ClipperCurve, CompressorCurve, GateCurve, LimiterCurve};
pub use lfo::Lfo;
pub use math::{
    MIN_AMPLITUDE, MIN_LEVEL_DB, db_to_linear, flush_denormal, linear_to_db, ms_to_samples,
    sanitize, time_constant,
};
pub use mix::{constant_power_pan, equal_power_gains, equal_power_mix, mix_into};
pub use param_info::{ParamDescriptor, ParamKind, ParamScale, ParamUnit, find_param};
pub use processor::{ProcessSpec, Processor, ReductionMeter};
pub use reverb_tank::{AllpassFilter, CombFilter};
pub use waveshape::{WaveShape, foldback, hard_clip};
