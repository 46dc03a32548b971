//! Brickwall peak limiter.
//!
//! Instant-attack envelope, threshold/ceiling gain computer. Gain is
//! auto-compensated so a signal at threshold comes out at the ceiling, and the
//! output is clamped to the ceiling as a last step.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `threshold` | -24 to 0 dB | -6 |
//! | `ceiling` | -12 to 0 dB | -0.3 |
//! | `release` | 1-500 ms | 50 |
//! | `stereo_link` | toggle | on |

use ballista_core::{
    Ballistics, ControlSurface, Defaults, LimiterCurve, ParamDescriptor, ProcessSpec, Processor,
    ReductionMeter, StereoBlock, StereoEnvelope, StereoLink, hard_clip, linear_to_db,
};

const THRESHOLD: usize = 0;
const CEILING: usize = 1;
const RELEASE: usize = 2;
const STEREO_LINK: usize = 3;

/// Limiter controls.
pub static PARAMS: [ParamDescriptor; 4] = [
    ParamDescriptor::gain_db("threshold", "Threshold", -24.0, 0.0, -6.0),
    ParamDescriptor::gain_db("ceiling", "Ceiling", -12.0, 0.0, -0.3),
    ParamDescriptor::time_ms("release", "Release", 1.0, 500.0, 50.0),
    ParamDescriptor::toggle("stereo_link", "Stereo Link", true),
];

/// One block's limiter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Output ceiling in dB.
    pub ceiling_db: f32,
    /// Release in ms.
    pub release_ms: f32,
    /// Linked stereo detection.
    pub stereo_link: bool,
}

impl LimiterParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            threshold_db: PARAMS[THRESHOLD].read(controls),
            ceiling_db: PARAMS[CEILING].read(controls),
            release_ms: PARAMS[RELEASE].read(controls),
            stereo_link: PARAMS[STEREO_LINK].read_flag(controls),
        }
    }
}

impl Default for LimiterParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo limiter.
#[derive(Debug, Clone, Default)]
pub struct Limiter {
    spec: ProcessSpec,
    envelope: StereoEnvelope,
    meter: ReductionMeter<2>,
}

impl Limiter {
    /// An unprepared limiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &LimiterParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);

        let ballistics = Ballistics::instant_attack(params.release_ms, self.spec.sample_rate);
        let curve = LimiterCurve::new(params.threshold_db, params.ceiling_db);
        let ceiling = curve.ceiling();
        let link = StereoLink::from_flag(params.stereo_link);

        self.meter.begin_block();
        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            let levels = self.envelope.process(*l, *r, link, &ballistics);
            for (ch, x) in [l, r].into_iter().enumerate() {
                let level_db = linear_to_db(levels[ch]);
                self.meter.record(ch, curve.reduction_db(level_db));
                *x = hard_clip(*x * curve.gain(level_db), ceiling);
            }
        }
        self.meter.finish_block();
    }
}

impl Processor for Limiter {
    fn name(&self) -> &'static str {
        "limiter"
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
        self.envelope.reset();
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = LimiterParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
