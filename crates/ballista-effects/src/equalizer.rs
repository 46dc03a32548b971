//! Six-section equalizer: HPF, low shelf, two peaks, high shelf, LPF.
//!
//! Everything runs as one ten-stage [`FilterPipeline`]:
//!
//! ```text
//! stage  0..3   Butterworth highpass (1-3 sections by slope)
//! stage  3      low shelf     (Q 1.0)
//! stage  4      low-mid peak
//! stage  5      high-mid peak
//! stage  6      high shelf    (Q 1.0)
//! stage  7..10  Butterworth lowpass
//! ```
//!
//! Switched-off HPF/LPF sections and sections above the chosen slope are
//! identity biquads, so the cascade length never changes.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `hpf` | toggle | off |
//! | `hpf_freq` | 20-2000 Hz | 80 |
//! | `hpf_slope` | 12 / 24 / 36 dB/oct | 12 |
//! | `low_shelf_freq` | 20-1000 Hz | 120 |
//! | `low_shelf_gain` | ±18 dB | 0 |
//! | `low_mid_freq` | 100-5000 Hz | 500 |
//! | `low_mid_gain` | ±18 dB | 0 |
//! | `low_mid_q` | 0.1-10 | 1 |
//! | `high_mid_freq` | 500-16000 Hz | 3000 |
//! | `high_mid_gain` | ±18 dB | 0 |
//! | `high_mid_q` | 0.1-10 | 1 |
//! | `high_shelf_freq` | 1-20 kHz | 8 kHz |
//! | `high_shelf_gain` | ±18 dB | 0 |
//! | `lpf` | toggle | off |
//! | `lpf_freq` | 1-20 kHz | 16 kHz |
//! | `lpf_slope` | 12 / 24 / 36 dB/oct | 12 |
//! | `output` | ±24 dB | 0 |

use ballista_core::{
    ButterworthSlope, ControlSurface, Defaults, FilterDesign, FilterPipeline, ParamDescriptor,
    ParamScale, ParamUnit, PassKind, ProcessSpec, Processor, StereoBlock, butterworth_designs,
    db_to_linear,
};

/// Slope choice labels.
pub const SLOPE_NAMES: &[&str] = &["12 dB/oct", "24 dB/oct", "36 dB/oct"];

const SHELF_Q: f32 = 1.0;

const HPF: usize = 0;
const HPF_FREQ: usize = 1;
const HPF_SLOPE: usize = 2;
const LOW_SHELF_FREQ: usize = 3;
const LOW_SHELF_GAIN: usize = 4;
const LOW_MID_FREQ: usize = 5;
const LOW_MID_GAIN: usize = 6;
const LOW_MID_Q: usize = 7;
const HIGH_MID_FREQ: usize = 8;
const HIGH_MID_GAIN: usize = 9;
const HIGH_MID_Q: usize = 10;
const HIGH_SHELF_FREQ: usize = 11;
const HIGH_SHELF_GAIN: usize = 12;
const LPF: usize = 13;
const LPF_FREQ: usize = 14;
const LPF_SLOPE: usize = 15;
const OUTPUT: usize = 16;

const fn q(name: &'static str, label: &'static str) -> ParamDescriptor {
    ParamDescriptor::float(name, label, ParamUnit::None, 0.1, 10.0, 1.0)
        .with_scale(ParamScale::Logarithmic)
}

/// Equalizer controls.
pub static PARAMS: [ParamDescriptor; 17] = [
    ParamDescriptor::toggle("hpf", "HPF", false).with_group("High Pass"),
    ParamDescriptor::frequency_hz("hpf_freq", "HPF Freq", 20.0, 2000.0, 80.0).with_group("High Pass"),
    ParamDescriptor::choice("hpf_slope", "HPF Slope", SLOPE_NAMES, 0).with_group("High Pass"),
    ParamDescriptor::frequency_hz("low_shelf_freq", "Low Shelf Freq", 20.0, 1000.0, 120.0)
        .with_group("Low Shelf"),
    ParamDescriptor::gain_db("low_shelf_gain", "Low Shelf Gain", -18.0, 18.0, 0.0)
        .with_group("Low Shelf"),
    ParamDescriptor::frequency_hz("low_mid_freq", "Low Mid Freq", 100.0, 5000.0, 500.0)
        .with_group("Low Mid"),
    ParamDescriptor::gain_db("low_mid_gain", "Low Mid Gain", -18.0, 18.0, 0.0).with_group("Low Mid"),
    q("low_mid_q", "Low Mid Q").with_group("Low Mid"),
    ParamDescriptor::frequency_hz("high_mid_freq", "High Mid Freq", 500.0, 16000.0, 3000.0)
        .with_group("High Mid"),
    ParamDescriptor::gain_db("high_mid_gain", "High Mid Gain", -18.0, 18.0, 0.0)
        .with_group("High Mid"),
    q("high_mid_q", "High Mid Q").with_group("High Mid"),
    ParamDescriptor::frequency_hz("high_shelf_freq", "High Shelf Freq", 1000.0, 20000.0, 8000.0)
        .with_group("High Shelf"),
    ParamDescriptor::gain_db("high_shelf_gain", "High Shelf Gain", -18.0, 18.0, 0.0)
        .with_group("High Shelf"),
    ParamDescriptor::toggle("lpf", "LPF", false).with_group("Low Pass"),
    ParamDescriptor::frequency_hz("lpf_freq", "LPF Freq", 1000.0, 20000.0, 16000.0)
        .with_group("Low Pass"),
    ParamDescriptor::choice("lpf_slope", "LPF Slope", SLOPE_NAMES, 0).with_group("Low Pass"),
    ParamDescriptor::gain_db("output", "Output", -24.0, 24.0, 0.0),
];

/// Frequency, gain and Q of one bell or shelf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Centre or corner in Hz.
    pub freq: f32,
    /// Gain in dB.
    pub gain_db: f32,
    /// Bandwidth.
    pub q: f32,
}

/// One block's equalizer settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizerParams {
    /// Highpass on.
    pub hpf: bool,
    /// Highpass corner in Hz.
    pub hpf_freq: f32,
    /// Highpass slope.
    pub hpf_slope: ButterworthSlope,
    /// Low shelf (Q fixed at 1).
    pub low_shelf: Band,
    /// Low-mid bell.
    pub low_mid: Band,
    /// High-mid bell.
    pub high_mid: Band,
    /// High shelf (Q fixed at 1).
    pub high_shelf: Band,
    /// Lowpass on.
    pub lpf: bool,
    /// Lowpass corner in Hz.
    pub lpf_freq: f32,
    /// Lowpass slope.
    pub lpf_slope: ButterworthSlope,
    /// Output gain in dB.
    pub output_db: f32,
}

impl EqualizerParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        let read = |i: usize| PARAMS[i].read(controls);
        Self {
            hpf: PARAMS[HPF].read_flag(controls),
            hpf_freq: read(HPF_FREQ),
            hpf_slope: ButterworthSlope::from_index(PARAMS[HPF_SLOPE].read_choice(controls)),
            low_shelf: Band {
                freq: read(LOW_SHELF_FREQ),
                gain_db: read(LOW_SHELF_GAIN),
                q: SHELF_Q,
            },
            low_mid: Band {
                freq: read(LOW_MID_FREQ),
                gain_db: read(LOW_MID_GAIN),
                q: read(LOW_MID_Q),
            },
            high_mid: Band {
                freq: read(HIGH_MID_FREQ),
                gain_db: read(HIGH_MID_GAIN),
                q: read(HIGH_MID_Q),
            },
            high_shelf: Band {
                freq: read(HIGH_SHELF_FREQ),
                gain_db: read(HIGH_SHELF_GAIN),
                q: SHELF_Q,
            },
            lpf: PARAMS[LPF].read_flag(controls),
            lpf_freq: read(LPF_FREQ),
            lpf_slope: ButterworthSlope::from_index(PARAMS[LPF_SLOPE].read_choice(controls)),
            output_db: read(OUTPUT),
        }
    }
}

impl Default for EqualizerParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo six-section equalizer.
#[derive(Debug, Clone)]
pub struct Equalizer {
    spec: ProcessSpec,
    pipeline: FilterPipeline<10>,
    output: f32,
}

impl Default for Equalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Equalizer {
    /// An unprepared, flat equalizer.
    pub fn new() -> Self {
        Self {
            spec: ProcessSpec::UNPREPARED,
            pipeline: FilterPipeline::new(),
            output: 1.0,
        }
    }

    /// Design every stage for `params` at the prepared rate.
    pub fn configure(&mut self, params: &EqualizerParams) {
        let sr = self.spec.sample_rate;
        let hpf = butterworth_designs(PassKind::Highpass, params.hpf_freq, params.hpf_slope)
            .map(|d| d.enabled_if(params.hpf));
        let lpf = butterworth_designs(PassKind::Lowpass, params.lpf_freq, params.lpf_slope)
            .map(|d| d.enabled_if(params.lpf));

        self.pipeline.set_range(0, &hpf, sr);
        self.pipeline.set_design(3, shelf_low(params.low_shelf), sr);
        self.pipeline.set_design(4, peak(params.low_mid), sr);
        self.pipeline.set_design(5, peak(params.high_mid), sr);
        self.pipeline.set_design(6, shelf_high(params.high_shelf), sr);
        self.pipeline.set_range(7, &lpf, sr);
        self.output = db_to_linear(params.output_db);
    }

    /// Linear magnitude of the configured curve, output gain included.
    pub fn magnitude_at(&self, frequency: f64) -> f64 {
        self.pipeline.magnitude_at(frequency, self.spec.sample_rate) * f64::from(self.output)
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &EqualizerParams, block: StereoBlock<'_>) {
        let mut block = block.limit(&self.spec);
        self.configure(params);
        let [left, right] = block.channels();
        self.pipeline.process_block(left, right);
        for x in left.iter_mut().chain(right.iter_mut()) {
            *x *= self.output;
        }
    }
}

fn peak(b: Band) -> FilterDesign {
    FilterDesign::Peak {
        freq: b.freq,
        q: b.q,
        gain_db: b.gain_db,
    }
}

fn shelf_low(b: Band) -> FilterDesign {
    FilterDesign::LowShelf {
        freq: b.freq,
        q: b.q,
        gain_db: b.gain_db,
    }
}

fn shelf_high(b: Band) -> FilterDesign {
    FilterDesign::HighShelf {
        freq: b.freq,
        q: b.q,
        gain_db: b.gain_db,
    }
}

impl Processor for Equalizer {
    fn name(&self) -> &'static str {
        "equalizer"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        &[]
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        self.pipeline.update(spec.sample_rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.pipeline.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = EqualizerParams::from_controls(controls);
        self.process_with(&params, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(params: &EqualizerParams) -> Equalizer {
        let mut eq = Equalizer::new();
        eq.prepare(ProcessSpec::stereo(48000.0, 256));
        eq.configure(params);
        eq
    }

    fn db(m: f64) -> f64 {
        20.0 * m.log10()
    }

    #[test]
    fn test_default_is_flat() {
        let eq = configured(&EqualizerParams::default());
        for f in [20.0, 120.0, 1000.0, 8000.0, 20000.0] {
            assert!(db(eq.magnitude_at(f)).abs() < 0.01, "{f} Hz");
        }
    }

    #[test]
    fn test_flat_passes_dc() {
        let mut eq = Equalizer::new();
        eq.prepare(ProcessSpec::stereo(48000.0, 1000));
        let mut l = [1.0_f32; 1000];
        let mut r = [1.0_f32; 1000];
        eq.process(&Defaults, StereoBlock::new(&mut l, &mut r));
        assert!((l[999] - 1.0).abs() < 1e-3, "{}", l[999]);
    }

    #[test]
    fn test_bands_hit_their_targets() {
        let mut params = EqualizerParams::default();
        params.low_shelf.gain_db = 6.0;
        assert!((db(configured(&params).magnitude_at(20.0)) - 6.0).abs() < 0.5);

        let mut params = EqualizerParams::default();
        params.low_mid.gain_db = -6.0;
        assert!((db(configured(&params).magnitude_at(500.0)) + 6.0).abs() < 0.05);

        let mut params = EqualizerParams::default();
        params.high_shelf.gain_db = 3.0;
        assert!((db(configured(&params).magnitude_at(20000.0)) - 3.0).abs() < 0.5);
    }

    #[test]
    fn test_hpf_slope_and_corner() {
        let params = EqualizerParams {
            hpf: true,
            hpf_freq: 1000.0,
            hpf_slope: ButterworthSlope::Db24,
            ..Default::default()
        };
        let eq = configured(&params);
        assert!((db(eq.magnitude_at(1000.0)) + 3.01).abs() < 0.1);
        assert!(eq.magnitude_at(250.0) < 0.006);
    }

    #[test]
    fn test_disabled_lpf_is_identity() {
        let params = EqualizerParams {
            lpf: false,
            lpf_freq: 1000.0,
            lpf_slope: ButterworthSlope::Db36,
            ..Default::default()
        };
        let eq = configured(&params);
        for i in 7..10 {
            assert_eq!(eq.pipeline.stage(i).design(), FilterDesign::Identity);
        }
    }

    #[test]
    fn test_output_gain() {
        let params = EqualizerParams {
            output_db: -6.0,
            ..Default::default()
        };
        let eq = configured(&params);
        assert!((db(eq.magnitude_at(1000.0)) + 6.0).abs() < 0.01);
    }
}
