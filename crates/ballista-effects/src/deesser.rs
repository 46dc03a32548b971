//! Split-band de-esser.
//!
//! An LR4 crossover splits the signal at `frequency`. Only the upper band
//! feeds the detector and only the upper band is attenuated; the lower band
//! passes untouched and the two are summed back (LR4 bands recombine flat).
//!
//! ```text
//!            ┌─► low ─────────────────────────────┐
//! Input ─► LR4                                    + ─► Output
//!            └─► high ─┬─► Envelope → Curve ─► × ─┘
//!                      └──────────────────────►┘
//! ```
//!
//! With `listen` on, only the processed upper band is output.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `threshold` | -60 to 0 dB | -30 |
//! | `ratio` | 1 to 16 | 4 |
//! | `frequency` | 2-12 kHz | 6 kHz |
//! | `attack` | 0.1-20 ms | 1 |
//! | `release` | 5-200 ms | 60 |
//! | `stereo_link` | toggle | on |
//! | `listen` | toggle | off |

use ballista_core::{
    Ballistics, CompressorCurve, ControlSurface, Defaults, LinkwitzRiley, ParamDescriptor,
    ProcessSpec, Processor, ReductionMeter, StereoBlock, StereoEnvelope, StereoLink, db_to_linear,
    linear_to_db,
};

const THRESHOLD: usize = 0;
const RATIO: usize = 1;
const FREQUENCY: usize = 2;
const ATTACK: usize = 3;
const RELEASE: usize = 4;
const STEREO_LINK: usize = 5;
const LISTEN: usize = 6;

/// De-esser controls.
pub static PARAMS: [ParamDescriptor; 7] = [
    ParamDescriptor::gain_db("threshold", "Threshold", -60.0, 0.0, -30.0),
    ParamDescriptor::ratio("ratio", "Ratio", 1.0, 16.0, 4.0),
    ParamDescriptor::frequency_hz("frequency", "Frequency", 2000.0, 12000.0, 6000.0),
    ParamDescriptor::time_ms("attack", "Attack", 0.1, 20.0, 1.0),
    ParamDescriptor::time_ms("release", "Release", 5.0, 200.0, 60.0),
    ParamDescriptor::toggle("stereo_link", "Stereo Link", true),
    ParamDescriptor::toggle("listen", "Listen", false),
];

/// One block's de-esser settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeesserParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio (n:1).
    pub ratio: f32,
    /// Split frequency in Hz.
    pub frequency: f32,
    /// Attack in ms.
    pub attack_ms: f32,
    /// Release in ms.
    pub release_ms: f32,
    /// Linked stereo detection.
    pub stereo_link: bool,
    /// Output only the processed upper band.
    pub listen: bool,
}

impl DeesserParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            threshold_db: PARAMS[THRESHOLD].read(controls),
            ratio: PARAMS[RATIO].read(controls),
            frequency: PARAMS[FREQUENCY].read(controls),
            attack_ms: PARAMS[ATTACK].read(controls),
            release_ms: PARAMS[RELEASE].read(controls),
            stereo_link: PARAMS[STEREO_LINK].read_flag(controls),
            listen: PARAMS[LISTEN].read_flag(controls),
        }
    }
}

impl Default for DeesserParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo de-esser.
#[derive(Debug, Clone)]
pub struct Deesser {
    spec: ProcessSpec,
    split: LinkwitzRiley,
    envelope: StereoEnvelope,
    meter: ReductionMeter<2>,
}

impl Default for Deesser {
    fn default() -> Self {
        Self::new()
    }
}

impl Deesser {
    /// An unprepared de-esser.
    pub fn new() -> Self {
        Self {
            spec: ProcessSpec::UNPREPARED,
            split: LinkwitzRiley::new(PARAMS[FREQUENCY].default, 48000.0),
            envelope: StereoEnvelope::new(),
            meter: ReductionMeter::new(),
        }
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &DeesserParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let sr = self.spec.sample_rate;

        self.split.set_frequency(params.frequency, sr);
        let ballistics = Ballistics::from_times_ms(params.attack_ms, params.release_ms, sr);
        let curve = CompressorCurve::new(params.threshold_db, params.ratio, 0.0, 0.0);
        let link = StereoLink::from_flag(params.stereo_link);

        self.meter.begin_block();
        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            let (low_l, high_l) = self.split.split(0, *l);
            let (low_r, high_r) = self.split.split(1, *r);
            let levels = self.envelope.process(high_l, high_r, link, &ballistics);

            for (ch, (x, low, high)) in [(l, low_l, high_l), (r, low_r, high_r)]
                .into_iter()
                .enumerate()
            {
                let reduction = curve.reduction_db(linear_to_db(levels[ch]));
                self.meter.record(ch, reduction);
                let high = high * db_to_linear(reduction);
                *x = if params.listen { high } else { low + high };
            }
        }
        self.meter.finish_block();
    }
}

impl Processor for Deesser {
    fn name(&self) -> &'static str {
        "deesser"
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
        self.split.reset();
        self.envelope.reset();
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = DeesserParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
