//! Stereo feedback delay with width, tone filters, drive and chorus.
//!
//! # Signal Flow
//!
//! ```text
//! Input ─┬─► ring write ─► ring read (L: time+width, R: time-width)
//!        │                     │
//!        │              [HPF → LPF] → [atan drive] ─┬─► × feedback ─► ring
//!        │                                          ▼
//!        │                                       Chorus
//!        │                                          ▼
//!        └──────────────────────────────────► Equal-power mix → Output
//! ```
//!
//! # Feedback
//!
//! Feedback is the plain `feedback / 100` gain into the ring. At 100 % the
//! repeats never decay, and with drive off nothing bounds them; that is left
//! to the user.
//!
//! Delays shorter than the host block still repeat: the ring is serviced in
//! runs no longer than the shortest read delay, so output is the same at any
//! block size.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `time` | 1-2000 ms | 350 |
//! | `feedback` | 0-100 % | 35 |
//! | `width` | 0-20 ms | 0 |
//! | `drive` | 0-100 % | 0 |
//! | `filter` | toggle | off |
//! | `lowcut` | 20-2000 Hz | 80 |
//! | `highcut` | 1-20 kHz | 12 kHz |
//! | `mod_rate` | 0.05-5 Hz | 0.8 |
//! | `mod_depth` | 0-100 % | 0 |
//! | `mix` | 0-100 % | 35 |

use ballista_core::{
    BUTTERWORTH_Q, Chorus, ControlSurface, Defaults, DelayBuffer, FilterDesign, FilterPipeline,
    ParamDescriptor, ParamUnit, ProcessSpec, Processor, StereoBlock, StereoBuffer, WaveShape,
    mix_into, ms_to_samples,
};

/// Longest delay time in ms.
pub const MAX_TIME_MS: f32 = 2000.0;
/// Largest stereo offset in ms.
pub const MAX_WIDTH_MS: f32 = 20.0;
/// Drive factor at 100 %.
const MAX_DRIVE: f32 = 20.0;

const TIME: usize = 0;
const FEEDBACK: usize = 1;
const WIDTH: usize = 2;
const DRIVE: usize = 3;
const FILTER: usize = 4;
const LOWCUT: usize = 5;
const HIGHCUT: usize = 6;
const MOD_RATE: usize = 7;
const MOD_DEPTH: usize = 8;
const MIX: usize = 9;

/// Delay controls.
pub static PARAMS: [ParamDescriptor; 10] = [
    ParamDescriptor::time_ms("time", "Time", 1.0, MAX_TIME_MS, 350.0),
    ParamDescriptor::percent("feedback", "Feedback", 35.0),
    ParamDescriptor::float("width", "Width", ParamUnit::Milliseconds, 0.0, MAX_WIDTH_MS, 0.0)
        .with_step(0.1),
    ParamDescriptor::percent("drive", "Drive", 0.0),
    ParamDescriptor::toggle("filter", "Filter", false).with_group("Tone"),
    ParamDescriptor::frequency_hz("lowcut", "Low Cut", 20.0, 2000.0, 80.0).with_group("Tone"),
    ParamDescriptor::frequency_hz("highcut", "High Cut", 1000.0, 20000.0, 12000.0)
        .with_group("Tone"),
    ParamDescriptor::float("mod_rate", "Mod Rate", ParamUnit::Hertz, 0.05, 5.0, 0.8)
        .with_scale(ballista_core::ParamScale::Logarithmic)
        .with_group("Modulation"),
    ParamDescriptor::percent("mod_depth", "Mod Depth", 0.0).with_group("Modulation"),
    ParamDescriptor::percent("mix", "Mix", 35.0),
];

/// One block's delay settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayParams {
    /// Base delay in ms.
    pub time_ms: f32,
    /// Feedback in percent.
    pub feedback: f32,
    /// Stereo read offset in ms.
    pub width_ms: f32,
    /// Drive in percent; 0 bypasses the shaper.
    pub drive: f32,
    /// Enable the wet-path filters.
    pub filter: bool,
    /// Wet highpass in Hz.
    pub lowcut: f32,
    /// Wet lowpass in Hz.
    pub highcut: f32,
    /// Chorus rate in Hz.
    pub mod_rate: f32,
    /// Chorus depth in percent.
    pub mod_depth: f32,
    /// Dry/wet in percent.
    pub mix: f32,
}

impl DelayParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            time_ms: PARAMS[TIME].read(controls),
            feedback: PARAMS[FEEDBACK].read(controls),
            width_ms: PARAMS[WIDTH].read(controls),
            drive: PARAMS[DRIVE].read(controls),
            filter: PARAMS[FILTER].read_flag(controls),
            lowcut: PARAMS[LOWCUT].read(controls),
            highcut: PARAMS[HIGHCUT].read(controls),
            mod_rate: PARAMS[MOD_RATE].read(controls),
            mod_depth: PARAMS[MOD_DEPTH].read(controls),
            mix: PARAMS[MIX].read(controls),
        }
    }
}

impl Default for DelayParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo delay.
#[derive(Debug, Clone, Default)]
pub struct Delay {
    spec: ProcessSpec,
    ring: DelayBuffer,
    wet: StereoBuffer,
    filters: FilterPipeline<2>,
    chorus: Chorus,
}

impl Delay {
    /// An unprepared delay. `prepare` allocates the ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    ///
    /// The ring is written, read and fed back in runs no longer than the
    /// shortest delay, so every read sees feedback already added by earlier
    /// runs and the result does not depend on the host block size.
    pub fn process_with(&mut self, params: &DelayParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let n = block.len();
        let sr = self.spec.sample_rate;

        let base = ms_to_samples(params.time_ms, sr);
        let spread = ms_to_samples(params.width_ms, sr);
        let delays = [base + spread, base.saturating_sub(spread)];
        let run = delays[0].min(delays[1]).max(1);

        self.filters.set_designs(
            [
                FilterDesign::Highpass {
                    freq: params.lowcut,
                    q: BUTTERWORTH_Q,
                }
                .enabled_if(params.filter),
                FilterDesign::Lowpass {
                    freq: params.highcut,
                    q: BUTTERWORTH_Q,
                }
                .enabled_if(params.filter),
            ],
            sr,
        );
        let drive = (params.drive > 0.0).then(|| params.drive / 100.0 * MAX_DRIVE);
        let feedback = params.feedback / 100.0;

        let (wet_l, wet_r) = self.wet.split_mut(n);
        let mut start = 0;
        while start < n {
            let end = (start + run).min(n);
            let (wl, wr) = (&mut wet_l[start..end], &mut wet_r[start..end]);

            self.ring.write_block(0, &block.left[start..end]);
            self.ring.write_block(1, &block.right[start..end]);
            self.ring.read_block(0, delays[0], wl);
            self.ring.read_block(1, delays[1], wr);

            self.filters.process_block(wl, wr);
            if let Some(drive) = drive {
                for x in wl.iter_mut().chain(wr.iter_mut()) {
                    *x = WaveShape::Atan.shape(*x, drive, true);
                }
            }

            self.ring.add_block(0, wl, feedback);
            self.ring.add_block(1, wr, feedback);
            self.ring.advance(end - start);
            start = end;
        }

        self.chorus.set_rate(params.mod_rate);
        self.chorus.process_block(wet_l, wet_r, params.mod_depth / 100.0);

        let mix = params.mix / 100.0;
        mix_into(block.left, wet_l, mix);
        mix_into(block.right, wet_r, mix);
    }
}

impl Processor for Delay {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        &[]
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        let max_delay = ms_to_samples(MAX_TIME_MS + MAX_WIDTH_MS, spec.sample_rate);
        self.ring
            .allocate(DelayBuffer::capacity_for(max_delay, spec.max_block_size));
        self.wet.resize(spec.max_block_size);
        self.chorus.prepare(spec.sample_rate);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            capacity = self.ring.capacity(),
            "delay prepared"
        );
        self.reset();
    }

    fn reset(&mut self) {
        self.ring.clear();
        self.wet.clear();
        self.filters.reset();
        self.chorus.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = DelayParams::from_controls(controls);
        self.process_with(&params, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    /// 10 ms at 48 kHz, wet only, every colouring stage off.
    fn clean(feedback: f32) -> DelayParams {
        DelayParams {
            time_ms: 10.0,
            feedback,
            width_ms: 0.0,
            drive: 0.0,
            filter: false,
            mod_depth: 0.0,
            mix: 100.0,
            ..Default::default()
        }
    }

    fn run(params: &DelayParams, len: usize, block: usize) -> (Vec<f32>, Vec<f32>) {
        let mut d = Delay::new();
        d.prepare(ProcessSpec::stereo(SR, block));
        let mut l = vec![0.0; len];
        let mut r = vec![0.0; len];
        l[0] = 1.0;
        r[0] = 1.0;
        for (bl, br) in l.chunks_mut(block).zip(r.chunks_mut(block)) {
            d.process_with(params, StereoBlock::new(bl, br));
        }
        (l, r)
    }

    #[test]
    fn test_impulse_round_trip() {
        let (l, _) = run(&clean(0.0), 2048, 256);
        for (n, &y) in l.iter().enumerate() {
            let expected = if n == 480 { 1.0 } else { 0.0 };
            assert!((y - expected).abs() < 1e-6, "sample {n}: {y}");
        }
    }

    #[test]
    fn test_feedback_repeats() {
        let (l, _) = run(&clean(50.0), 2048, 128);
        assert!((l[480] - 1.0).abs() < 1e-6);
        assert!((l[960] - 0.5).abs() < 1e-6);
        assert!((l[1440] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_short_delay_repeats_inside_one_block() {
        let params = DelayParams {
            time_ms: 5.0,
            ..clean(50.0)
        };
        let (l, r) = run(&params, 1024, 512);
        for (k, expected) in [(1, 1.0), (2, 0.5), (3, 0.25)] {
            assert!((l[240 * k] - expected).abs() < 1e-6, "repeat {k}: {}", l[240 * k]);
            assert!((r[240 * k] - expected).abs() < 1e-6, "repeat {k}: {}", r[240 * k]);
        }
    }

    #[test]
    fn test_output_independent_of_block_size() {
        for width_ms in [0.0, 2.0] {
            let params = DelayParams {
                time_ms: 5.0,
                width_ms,
                ..clean(50.0)
            };
            let small = run(&params, 2048, 64);
            let large = run(&params, 2048, 512);
            for i in 0..2048 {
                assert!((small.0[i] - large.0[i]).abs() < 1e-6, "left {i}, width {width_ms}");
                assert!((small.1[i] - large.1[i]).abs() < 1e-6, "right {i}, width {width_ms}");
            }
        }
    }

    #[test]
    fn test_full_feedback_is_not_clamped() {
        let (l, _) = run(&clean(100.0), 4096, 512);
        for k in 1..8 {
            assert!((l[480 * k] - 1.0).abs() < 1e-5, "repeat {k}: {}", l[480 * k]);
        }
    }

    #[test]
    fn test_width_offsets_channels() {
        let params = DelayParams {
            width_ms: 1.0,
            ..clean(0.0)
        };
        let (l, r) = run(&params, 1024, 64);
        assert!((l[528] - 1.0).abs() < 1e-6);
        assert!((r[432] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_mix_keeps_dry() {
        let (l, _) = run(&DelayParams::default(), 64, 64);
        let (dry, _) = ballista_core::equal_power_gains(0.35);
        assert!((l[0] - dry).abs() < 1e-6);
    }

    #[test]
    fn test_drive_bounds_runaway() {
        let params = DelayParams {
            drive: 100.0,
            ..clean(100.0)
        };
        let (l, _) = run(&params, 8192, 512);
        assert!(l.iter().all(|x| x.is_finite() && x.abs() <= 1.05));
    }
}
