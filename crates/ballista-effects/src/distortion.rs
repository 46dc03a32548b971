//! Waveshaping distortion with pre/post tone filters.
//!
//! ```text
//! Input ─┬─► HPF (lowcut) ─► drive × shape ─► LPF (tone) ─► output gain ─┐
//!        └───────────────────────────────────────────────────────────────┴─► mix
//! ```
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `drive` | 0-48 dB | 12 |
//! | `shape` | atan / tanh / hard / foldback | atan |
//! | `lowcut` | 20-1000 Hz | 20 |
//! | `tone` | 1-20 kHz | 12 kHz |
//! | `auto_gain` | toggle | on |
//! | `output` | -24 to 24 dB | 0 |
//! | `mix` | 0-100 % | 100 |

use ballista_core::{
    BUTTERWORTH_Q, ControlSurface, Defaults, FilterDesign, FilterPipeline, ParamDescriptor,
    ProcessSpec, Processor, StereoBlock, WaveShape, db_to_linear, equal_power_gains,
    equal_power_mix,
};

const DRIVE: usize = 0;
const SHAPE: usize = 1;
const LOWCUT: usize = 2;
const TONE: usize = 3;
const AUTO_GAIN: usize = 4;
const OUTPUT: usize = 5;
const MIX: usize = 6;

/// Distortion controls.
pub static PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::gain_db("drive", "Drive", 0.0, 48.0, 12.0),
    ParamDescriptor::choice("shape", "Shape", WaveShape::NAMES, 0),
    ParamDescriptor::frequency_hz("lowcut", "Low Cut", 20.0, 1000.0, 20.0),
    ParamDescriptor::frequency_hz("tone", "Tone", 1000.0, 20000.0, 12000.0),
    ParamDescriptor::toggle("auto_gain", "Auto Gain", true),
    ParamDescriptor::gain_db("output", "Output", -24.0, 24.0, 0.0),
    ParamDescriptor::percent("mix", "Mix", 100.0),
];

/// One block's distortion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionParams {
    /// Pre-shaper gain in dB.
    pub drive_db: f32,
    /// Transfer curve.
    pub shape: WaveShape,
    /// Pre-shaper highpass in Hz.
    pub lowcut: f32,
    /// Post-shaper lowpass in Hz.
    pub tone: f32,
    /// Normalise the curve so a unit input stays at unity.
    pub auto_gain: bool,
    /// Output gain in dB.
    pub output_db: f32,
    /// Dry/wet in percent.
    pub mix: f32,
}

impl DistortionParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            drive_db: PARAMS[DRIVE].read(controls),
            shape: WaveShape::from_index(PARAMS[SHAPE].read_choice(controls)),
            lowcut: PARAMS[LOWCUT].read(controls),
            tone: PARAMS[TONE].read(controls),
            auto_gain: PARAMS[AUTO_GAIN].read_flag(controls),
            output_db: PARAMS[OUTPUT].read(controls),
            mix: PARAMS[MIX].read(controls),
        }
    }
}

impl Default for DistortionParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo distortion.
#[derive(Debug, Clone, Default)]
pub struct Distortion {
    spec: ProcessSpec,
    pre: FilterPipeline<1>,
    post: FilterPipeline<1>,
}

impl Distortion {
    /// An unprepared distortion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &DistortionParams, block: StereoBlock<'_>) {
        let mut block = block.limit(&self.spec);
        let sr = self.spec.sample_rate;

        self.pre.set_design(
            0,
            FilterDesign::Highpass {
                freq: params.lowcut,
                q: BUTTERWORTH_Q,
            },
            sr,
        );
        self.post.set_design(
            0,
            FilterDesign::Lowpass {
                freq: params.tone,
                q: BUTTERWORTH_Q,
            },
            sr,
        );

        let drive = db_to_linear(params.drive_db);
        let output = db_to_linear(params.output_db);
        let gains = equal_power_gains(params.mix / 100.0);

        for (ch, buf) in block.channels().into_iter().enumerate() {
            for x in buf.iter_mut() {
                let driven = params.shape.shape(self.pre.process(ch, *x), drive, params.auto_gain);
                let wet = self.post.process(ch, driven) * output;
                *x = equal_power_mix(*x, wet, gains);
            }
        }
    }
}

impl Processor for Distortion {
    fn name(&self) -> &'static str {
        "distortion"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        &[]
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        self.reset();
    }

    fn reset(&mut self) {
        self.pre.reset();
        self.post.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = DistortionParams::from_controls(controls);
        self.process_with(&params, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    const SR: f64 = 48000.0;
    const N: usize = 4800;

    fn run(params: &DistortionParams, amp: f32) -> Vec<f32> {
        let mut d = Distortion::new();
        d.prepare(ProcessSpec::stereo(SR, N));
        let mut l: Vec<f32> = (0..N)
            .map(|i| amp * libm::sinf(TAU * 440.0 * i as f32 / SR as f32))
            .collect();
        let mut r = l.clone();
        d.process_with(params, StereoBlock::new(&mut l, &mut r));
        l
    }

    fn tail_peak(x: &[f32]) -> f32 {
        x[N / 2..].iter().fold(0.0_f32, |m, v| m.max(v.abs()))
    }

    #[test]
    fn test_auto_gain_bounds_output() {
        for shape in [WaveShape::Atan, WaveShape::Tanh, WaveShape::Hard] {
            let params = DistortionParams {
                drive_db: 48.0,
                shape,
                ..Default::default()
            };
            let peak = tail_peak(&run(&params, 1.0));
            assert!(peak < 1.3, "{shape:?}: {peak}");
            assert!(peak > 0.5, "{shape:?}: {peak}");
        }
    }

    #[test]
    fn test_dry_mix_is_bypass() {
        let params = DistortionParams {
            mix: 0.0,
            ..Default::default()
        };
        let out = run(&params, 0.7);
        let expected = 0.7 * libm::sinf(TAU * 440.0 * 100.0 / SR as f32);
        assert!((out[100] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_output_gain_scales_wet() {
        let loud = DistortionParams::default();
        let quiet = DistortionParams {
            output_db: -12.0,
            ..Default::default()
        };
        let ratio = tail_peak(&run(&quiet, 0.5)) / tail_peak(&run(&loud, 0.5));
        assert!((ratio - db_to_linear(-12.0)).abs() < 0.01, "{ratio}");
    }

    #[test]
    fn test_shape_choice_from_controls() {
        let controls = [("shape", 2.0_f32)];
        let params = DistortionParams::from_controls(&controls);
        assert_eq!(params.shape, WaveShape::Hard);
    }
}
