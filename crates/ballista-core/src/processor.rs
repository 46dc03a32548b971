//! The processor lifecycle shared by every effect.
//!
//! ```text
//! new() ──► prepare(spec) ──► process(controls, block) ... ──► reset() ──► process ...
//!                 ▲                                                │
//!                 └──────────── configuration change ◄─────────────┘
//! ```
//!
//! `prepare` runs off the audio thread and may allocate. `process` and
//! `reset` never allocate, block or fail.

use crate::buffer::StereoBlock;
use crate::control::ControlSurface;
use crate::param_info::ParamDescriptor;

/// Host configuration passed to [`Processor::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Longest block `process` will be called with.
    pub max_block_size: usize,
    /// Channel count; processors are stereo, mono hosts duplicate.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Configuration of a processor that has not been prepared.
    pub const UNPREPARED: Self = Self {
        sample_rate: 0.0,
        max_block_size: 0,
        num_channels: 0,
    };

    /// A stereo configuration.
    pub const fn stereo(sample_rate: f64, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels: 2,
        }
    }

    /// True once a usable configuration has been supplied.
    pub fn is_prepared(&self) -> bool {
        self.sample_rate > 0.0 && self.max_block_size > 0
    }
}

/// A block-based stereo effect.
///
/// Object safe; hosts hold `Box<dyn Processor + Send>`.
///
/// # Example
///
/// ```rust,ignore
/// let mut fx = registry.create("compressor").unwrap();
/// fx.prepare(ProcessSpec::stereo(48000.0, 512));
///
/// let store = ParamStore::new(fx.params());
/// store.set("threshold", -18.0);
///
/// fx.process(&store, StereoBlock::new(&mut left, &mut right));
/// println!("gain reduction: {:?}", fx.meters());
/// ```
pub trait Processor {
    /// Registry id (e.g. `"compressor"`).
    fn name(&self) -> &'static str;

    /// Control table.
    fn params(&self) -> &'static [ParamDescriptor];

    /// Gain-reduction readouts from the last block, in positive dB.
    fn meters(&self) -> &[f32];

    /// Number of meter values.
    fn meter_count(&self) -> usize {
        self.meters().len()
    }

    /// Configure for a sample rate and maximum block size, resetting all
    /// transient state. May allocate.
    fn prepare(&mut self, spec: ProcessSpec);

    /// Clear envelopes, hold counters, filter and delay state.
    fn reset(&mut self);

    /// Snapshot `controls` once, then process `block` in place.
    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>);
}

/// Per-block gain-reduction meter for `N` channels (or band-channels).
///
/// Collects the most negative gain (dB) seen in the block and exposes it
/// with the sign flipped, so 6 dB of attenuation reads `6.0`.
#[derive(Debug, Clone, Copy)]
pub struct ReductionMeter<const N: usize> {
    block_min: [f32; N],
    readout: [f32; N],
}

impl<const N: usize> ReductionMeter<N> {
    /// A meter reading no reduction.
    pub const fn new() -> Self {
        Self {
            block_min: [0.0; N],
            readout: [0.0; N],
        }
    }

    /// Start a block.
    #[inline]
    pub fn begin_block(&mut self) {
        self.block_min = [0.0; N];
    }

    /// Record a gain (in dB, ≤ 0 for attenuation) on slot `index`.
    #[inline]
    pub fn record(&mut self, index: usize, gain_db: f32) {
        if gain_db < self.block_min[index] {
            self.block_min[index] = gain_db;
        }
    }

    /// Publish the block's readout.
    #[inline]
    pub fn finish_block(&mut self) {
        for (out, &min) in self.readout.iter_mut().zip(&self.block_min) {
            *out = (-min).max(0.0);
        }
    }

    /// Positive dB of reduction per slot.
    pub fn readout(&self) -> &[f32] {
        &self.readout
    }

    /// Back to no reduction.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const N: usize> Default for ReductionMeter<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_prepared() {
        assert!(!ProcessSpec::UNPREPARED.is_prepared());
        assert!(!ProcessSpec::default().is_prepared());
        assert!(ProcessSpec::stereo(44100.0, 64).is_prepared());
    }

    #[test]
    fn test_meter_tracks_block_minimum() {
        let mut m: ReductionMeter<2> = ReductionMeter::new();
        m.begin_block();
        m.record(0, -3.0);
        m.record(0, -7.5);
        m.record(0, -1.0);
        m.record(1, 2.0);
        m.finish_block();
        assert_eq!(m.readout(), &[7.5, 0.0]);

        m.begin_block();
        m.finish_block();
        assert_eq!(m.readout(), &[0.0, 0.0]);
    }
}
