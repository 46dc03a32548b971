//! Noise gate / downward expander with hold.
//!
//! The rectified input is compared against the threshold every sample. The
//! gate curve turns that into a target gain (1.0 when open), and the
//! attack/hold/release ballistics act on the gain itself:
//!
//! ```text
//!         target ─► HoldEnvelope ─► × ─► output
//!            ▲                      ▲
//! |input| ─► dB ─► GateCurve        input
//! ```
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `threshold` | -80 to 0 dB | -40 |
//! | `ratio` | 1 to 100 | 80 |
//! | `attack` | 0.1-50 ms | 1 |
//! | `hold` | 0-500 ms | 0 |
//! | `release` | 5-1000 ms | 100 |
//! | `stereo_link` | toggle | on |
//!
//! The gate starts closed after `prepare` and `reset`.

use ballista_core::{
    Ballistics, ControlSurface, Defaults, GateCurve, HoldEnvelope, MIN_AMPLITUDE, ParamDescriptor,
    ParamUnit, ProcessSpec, Processor, ReductionMeter, StereoBlock, linear_to_db, ms_to_samples,
};

const THRESHOLD: usize = 0;
const RATIO: usize = 1;
const ATTACK: usize = 2;
const HOLD: usize = 3;
const RELEASE: usize = 4;
const STEREO_LINK: usize = 5;

/// Gate controls.
pub static PARAMS: [ParamDescriptor; 6] = [
    ParamDescriptor::gain_db("threshold", "Threshold", -80.0, 0.0, -40.0),
    ParamDescriptor::ratio("ratio", "Ratio", 1.0, 100.0, 80.0),
    ParamDescriptor::time_ms("attack", "Attack", 0.1, 50.0, 1.0),
    // Linear: a log scale cannot reach 0 ms.
    ParamDescriptor::float("hold", "Hold", ParamUnit::Milliseconds, 0.0, 500.0, 0.0).with_step(1.0),
    ParamDescriptor::time_ms("release", "Release", 5.0, 1000.0, 100.0),
    ParamDescriptor::toggle("stereo_link", "Stereo Link", true),
];

/// One block's gate settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Expansion ratio; large values approach a hard gate.
    pub ratio: f32,
    /// Attack in ms.
    pub attack_ms: f32,
    /// Hold in ms.
    pub hold_ms: f32,
    /// Release in ms.
    pub release_ms: f32,
    /// One gain for both channels.
    pub stereo_link: bool,
}

impl GateParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            threshold_db: PARAMS[THRESHOLD].read(controls),
            ratio: PARAMS[RATIO].read(controls),
            attack_ms: PARAMS[ATTACK].read(controls),
            hold_ms: PARAMS[HOLD].read(controls),
            release_ms: PARAMS[RELEASE].read(controls),
            stereo_link: PARAMS[STEREO_LINK].read_flag(controls),
        }
    }
}

impl Default for GateParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo gate.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    spec: ProcessSpec,
    states: [HoldEnvelope; 2],
    meter: ReductionMeter<2>,
}

impl Gate {
    /// An unprepared gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gain state per channel (0 closed, 1 open).
    pub fn gain_state(&self) -> [f32; 2] {
        [self.states[0].state(), self.states[1].state()]
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &GateParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let sr = self.spec.sample_rate;

        let ballistics = Ballistics::from_times_ms(params.attack_ms, params.release_ms, sr);
        let hold = u32::try_from(ms_to_samples(params.hold_ms, sr)).unwrap_or(u32::MAX);
        let curve = GateCurve::new(params.threshold_db, params.ratio);

        self.meter.begin_block();
        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            let gains = if params.stereo_link {
                let target = curve.target(linear_to_db(l.abs().max(r.abs())));
                let g = self.states[0].process(target, &ballistics, hold);
                self.states[1] = self.states[0];
                [g, g]
            } else {
                [
                    self.states[0].process(curve.target(linear_to_db(l.abs())), &ballistics, hold),
                    self.states[1].process(curve.target(linear_to_db(r.abs())), &ballistics, hold),
                ]
            };

            for (ch, x) in [l, r].into_iter().enumerate() {
                // Attenuating silence is not reduction.
                if x.abs() > MIN_AMPLITUDE {
                    self.meter.record(ch, linear_to_db(gains[ch]));
                }
                *x *= gains[ch];
            }
        }
        self.meter.finish_block();
    }
}

impl Processor for Gate {
    fn name(&self) -> &'static str {
        "gate"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        self.meter.readout()
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        self.reset();
    }

    fn reset(&mut self) {
        for s in &mut self.states {
            s.reset();
        }
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = GateParams::from_controls(controls);
        self.process_with(&params, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared() -> Gate {
        let mut g = Gate::new();
        g.prepare(ProcessSpec::stereo(48000.0, 480));
        g
    }

    #[test]
    fn test_starts_closed_and_opens() {
        let mut g = prepared();
        assert_eq!(g.gain_state(), [0.0, 0.0]);
        let mut l = [0.5_f32; 480];
        let mut r = [0.5_f32; 480];
        g.process(&Defaults, StereoBlock::new(&mut l, &mut r));
        assert!(l[0] < 0.5);
        assert!(g.gain_state()[0] > 0.99);
    }

    #[test]
    fn test_hold_delays_release() {
        let mut g = prepared();
        let params = GateParams {
            threshold_db: -30.0,
            hold_ms: 5.0,
            release_ms: 5.0,
            ..Default::default()
        };
        let mut l = [1.0_f32; 480];
        let mut r = [1.0_f32; 480];
        g.process_with(&params, StereoBlock::new(&mut l, &mut r));

        let mut l = [0.001_f32; 480];
        let mut r = [0.001_f32; 480];
        g.process_with(&params, StereoBlock::new(&mut l, &mut r));
        // 5 ms hold = 240 samples at full gain.
        assert!((l[200] - 0.001).abs() < 1e-6);
        assert!((l[239] - 0.001).abs() < 1e-6);
        assert!(l[479] < 0.0005);
    }

    #[test]
    fn test_dual_mono_independent() {
        let mut g = prepared();
        let params = GateParams {
            stereo_link: false,
            ..Default::default()
        };
        let mut l = [0.5_f32; 480];
        let mut r = [0.0001_f32; 480];
        g.process_with(&params, StereoBlock::new(&mut l, &mut r));
        let [gl, gr] = g.gain_state();
        assert!(gl > 0.99);
        assert!(gr < 1e-3);
        assert!(g.meters()[1] > 40.0);
    }

    #[test]
    fn test_silence_reads_no_reduction() {
        let mut g = prepared();
        let mut l = [0.0_f32; 480];
        let mut r = [0.0_f32; 480];
        g.process(&Defaults, StereoBlock::new(&mut l, &mut r));
        assert!(l.iter().chain(r.iter()).all(|&x| x == 0.0));
        assert_eq!(g.meters(), &[0.0, 0.0]);
    }
}
