//! Feed-forward peak compressor.
//!
//! # Signal Flow
//!
//! ```text
//! Input ─┬─► [Sidechain HPF] → Envelope → Gain Computer ─┐
//!        │                                               ▼
//!        ├──────────────────────────────────────────► × gain × makeup ─┐
//!        │                                                             ▼
//!        └─────────────────────────────────────────────────► Equal-power mix → Output
//! ```
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `threshold` | -40 to 0 dB | -20 |
//! | `ratio` | 1 to 16 | 4 |
//! | `attack` | 0.5-100 ms | 10 |
//! | `release` | 5-500 ms | 100 |
//! | `makeup` | 0-24 dB | 0 |
//! | `knee` | 0-12 dB | 0 |
//! | `stereo_link` | toggle | on |
//! | `sidechain_hpf` | toggle | off |
//! | `sidechain_freq` | 20-500 Hz | 100 |
//! | `mix` | 0-100 % | 100 |
//!
//! Meters: gain reduction for left and right.

use ballista_core::{
    BUTTERWORTH_Q, Ballistics, CompressorCurve, ControlSurface, Defaults, FilterDesign,
    FilterPipeline, ParamDescriptor, ProcessSpec, Processor, ReductionMeter, StereoBlock,
    StereoEnvelope, StereoLink, db_to_linear, equal_power_gains, equal_power_mix, linear_to_db,
};

const THRESHOLD: usize = 0;
const RATIO: usize = 1;
const ATTACK: usize = 2;
const RELEASE: usize = 3;
const MAKEUP: usize = 4;
const KNEE: usize = 5;
const STEREO_LINK: usize = 6;
const SIDECHAIN_HPF: usize = 7;
const SIDECHAIN_FREQ: usize = 8;
const MIX: usize = 9;

/// Compressor controls.
pub static PARAMS: [ParamDescriptor; 10] = [
    ParamDescriptor::gain_db("threshold", "Threshold", -40.0, 0.0, -20.0),
    ParamDescriptor::ratio("ratio", "Ratio", 1.0, 16.0, 4.0),
    ParamDescriptor::time_ms("attack", "Attack", 0.5, 100.0, 10.0),
    ParamDescriptor::time_ms("release", "Release", 5.0, 500.0, 100.0),
    ParamDescriptor::gain_db("makeup", "Makeup", 0.0, 24.0, 0.0),
    ParamDescriptor::gain_db("knee", "Knee", 0.0, 12.0, 0.0),
    ParamDescriptor::toggle("stereo_link", "Stereo Link", true),
    ParamDescriptor::toggle("sidechain_hpf", "Sidechain HPF", false).with_group("Sidechain"),
    ParamDescriptor::frequency_hz("sidechain_freq", "Sidechain Freq", 20.0, 500.0, 100.0)
        .with_group("Sidechain"),
    ParamDescriptor::percent("mix", "Mix", 100.0),
];

/// One block's compressor settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio (n:1).
    pub ratio: f32,
    /// Attack in ms.
    pub attack_ms: f32,
    /// Release in ms.
    pub release_ms: f32,
    /// Makeup gain in dB.
    pub makeup_db: f32,
    /// Soft-knee width in dB; 0 is a hard knee.
    pub knee_db: f32,
    /// Linked stereo detection.
    pub stereo_link: bool,
    /// Highpass the detector input.
    pub sidechain_hpf: bool,
    /// Detector highpass cutoff in Hz.
    pub sidechain_freq: f32,
    /// Dry/wet in percent.
    pub mix: f32,
}

impl CompressorParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            threshold_db: PARAMS[THRESHOLD].read(controls),
            ratio: PARAMS[RATIO].read(controls),
            attack_ms: PARAMS[ATTACK].read(controls),
            release_ms: PARAMS[RELEASE].read(controls),
            makeup_db: PARAMS[MAKEUP].read(controls),
            knee_db: PARAMS[KNEE].read(controls),
            stereo_link: PARAMS[STEREO_LINK].read_flag(controls),
            sidechain_hpf: PARAMS[SIDECHAIN_HPF].read_flag(controls),
            sidechain_freq: PARAMS[SIDECHAIN_FREQ].read(controls),
            mix: PARAMS[MIX].read(controls),
        }
    }
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo compressor.
///
/// # Example
///
/// ```rust
/// use ballista_core::{ProcessSpec, Processor, StereoBlock};
/// use ballista_effects::{Compressor, CompressorParams};
///
/// let mut comp = Compressor::new();
/// comp.prepare(ProcessSpec::stereo(48000.0, 256));
///
/// let params = CompressorParams { threshold_db: -10.0, ratio: 4.0, ..Default::default() };
/// let mut left = [0.9_f32; 256];
/// let mut right = [0.9_f32; 256];
/// comp.process_with(&params, StereoBlock::new(&mut left, &mut right));
/// assert!(left[255] < 0.9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    spec: ProcessSpec,
    envelope: StereoEnvelope,
    sidechain: FilterPipeline<1>,
    meter: ReductionMeter<2>,
}

impl Compressor {
    /// An unprepared compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &CompressorParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let sr = self.spec.sample_rate;

        let ballistics = Ballistics::from_times_ms(params.attack_ms, params.release_ms, sr);
        let curve = CompressorCurve::new(params.threshold_db, params.ratio, params.knee_db, 0.0);
        let makeup = db_to_linear(params.makeup_db);
        let link = StereoLink::from_flag(params.stereo_link);
        let mix = equal_power_gains(params.mix / 100.0);
        self.sidechain.set_design(
            0,
            FilterDesign::Highpass {
                freq: params.sidechain_freq,
                q: BUTTERWORTH_Q,
            }
            .enabled_if(params.sidechain_hpf),
            sr,
        );

        self.meter.begin_block();
        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            let detect_l = self.sidechain.process(0, *l);
            let detect_r = self.sidechain.process(1, *r);
            let levels = self.envelope.process(detect_l, detect_r, link, &ballistics);

            for (ch, x) in [l, r].into_iter().enumerate() {
                let reduction = curve.reduction_db(linear_to_db(levels[ch]));
                self.meter.record(ch, reduction);
                let wet = *x * db_to_linear(reduction) * makeup;
                *x = equal_power_mix(*x, wet, mix);
            }
        }
        self.meter.finish_block();
    }
}

impl Processor for Compressor {
    fn name(&self) -> &'static str {
        "compressor"
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
        self.sidechain.reset();
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = CompressorParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
