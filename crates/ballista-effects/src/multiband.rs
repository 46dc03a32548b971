//! Four-band compressor.
//!
//! # Band split
//!
//! ```text
//!                 ┌─► LP(mid) ─► AP(high) ─► LR4(low)  ─┬─► band 1
//!                 │                                     └─► band 2
//! Input ─► LR4(mid)
//!                 │                                     ┌─► band 3
//!                 └─► HP(mid) ─► AP(low)  ─► LR4(high) ─┴─► band 4
//! ```
//!
//! Each half passes through an allpass matching the phase of the split it
//! does not take, so both halves carry the same total phase and the four
//! bands sum to an allpass: flat magnitude when no band is compressing.
//!
//! The split points always come from [`CrossoverFrequencies::sanitized`],
//! whatever the controls hold; correcting the stored values is the host's
//! job (see `validate_crossovers`).
//!
//! # Bands
//!
//! Every band runs a stereo envelope and a hard-knee compressor curve with
//! makeup. Bypassed bands pass through unchanged. If any band is soloed only
//! soloed bands reach the output.
//!
//! # Meters
//!
//! Eight readouts, `band * 2 + channel`.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `low_freq` | 20-1000 Hz | 120 |
//! | `mid_freq` | 100-5000 Hz | 1000 |
//! | `high_freq` | 500-16000 Hz | 6000 |
//! | `b{n}_threshold` | -60 to 0 dB | -18 |
//! | `b{n}_ratio` | 1 to 16 | 2 |
//! | `b{n}_attack` | 0.5-100 ms | 10 |
//! | `b{n}_release` | 5-500 ms | 100 |
//! | `b{n}_makeup` | 0-24 dB | 0 |
//! | `b{n}_solo` | toggle | off |
//! | `b{n}_bypass` | toggle | off |
//! | `stereo_link` | toggle | on |
//! | `output` | ±24 dB | 0 |

use ballista_core::{
    Ballistics, CompressorCurve, ControlSurface, CrossoverFrequencies, Defaults, LinkwitzRiley,
    LrAllpass, ParamDescriptor, ProcessSpec, Processor, ReductionMeter, StereoBlock,
    StereoEnvelope, StereoLink, db_to_linear, linear_to_db,
};

/// Number of bands.
pub const BANDS: usize = 4;

const LOW_FREQ: usize = 0;
const MID_FREQ: usize = 1;
const HIGH_FREQ: usize = 2;
const FIRST_BAND: usize = 3;
const PER_BAND: usize = 7;
const STEREO_LINK: usize = FIRST_BAND + BANDS * PER_BAND;
const OUTPUT: usize = STEREO_LINK + 1;

// Offsets within a band's block of controls.
const THRESHOLD: usize = 0;
const RATIO: usize = 1;
const ATTACK: usize = 2;
const RELEASE: usize = 3;
const MAKEUP: usize = 4;
const SOLO: usize = 5;
const BYPASS: usize = 6;

macro_rules! multiband_params {
    ($($n:literal),*) => {
        [
            ParamDescriptor::frequency_hz("low_freq", "Low Crossover", 20.0, 1000.0, 120.0)
                .with_group("Crossover"),
            ParamDescriptor::frequency_hz("mid_freq", "Mid Crossover", 100.0, 5000.0, 1000.0)
                .with_group("Crossover"),
            ParamDescriptor::frequency_hz("high_freq", "High Crossover", 500.0, 16000.0, 6000.0)
                .with_group("Crossover"),
            $(
                ParamDescriptor::gain_db(
                    concat!("b", $n, "_threshold"), "Threshold", -60.0, 0.0, -18.0,
                ).with_group(concat!("Band ", $n)),
                ParamDescriptor::ratio(concat!("b", $n, "_ratio"), "Ratio", 1.0, 16.0, 2.0)
                    .with_group(concat!("Band ", $n)),
                ParamDescriptor::time_ms(concat!("b", $n, "_attack"), "Attack", 0.5, 100.0, 10.0)
                    .with_group(concat!("Band ", $n)),
                ParamDescriptor::time_ms(concat!("b", $n, "_release"), "Release", 5.0, 500.0, 100.0)
                    .with_group(concat!("Band ", $n)),
                ParamDescriptor::gain_db(concat!("b", $n, "_makeup"), "Makeup", 0.0, 24.0, 0.0)
                    .with_group(concat!("Band ", $n)),
                ParamDescriptor::toggle(concat!("b", $n, "_solo"), "Solo", false)
                    .with_group(concat!("Band ", $n)),
                ParamDescriptor::toggle(concat!("b", $n, "_bypass"), "Bypass", false)
                    .with_group(concat!("Band ", $n)),
            )*
            ParamDescriptor::toggle("stereo_link", "Stereo Link", true),
            ParamDescriptor::gain_db("output", "Output", -24.0, 24.0, 0.0),
        ]
    };
}

/// Multiband controls.
pub static PARAMS: [ParamDescriptor; OUTPUT + 1] = multiband_params!(1, 2, 3, 4);

/// Settings of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Ratio (n:1).
    pub ratio: f32,
    /// Attack in ms.
    pub attack_ms: f32,
    /// Release in ms.
    pub release_ms: f32,
    /// Makeup in dB.
    pub makeup_db: f32,
    /// Listen to this band (and other soloed bands) only.
    pub solo: bool,
    /// Pass the band uncompressed.
    pub bypass: bool,
}

impl BandParams {
    fn from_controls(controls: &dyn ControlSurface, band: usize) -> Self {
        let p = &PARAMS[FIRST_BAND + band * PER_BAND..FIRST_BAND + (band + 1) * PER_BAND];
        Self {
            threshold_db: p[THRESHOLD].read(controls),
            ratio: p[RATIO].read(controls),
            attack_ms: p[ATTACK].read(controls),
            release_ms: p[RELEASE].read(controls),
            makeup_db: p[MAKEUP].read(controls),
            solo: p[SOLO].read_flag(controls),
            bypass: p[BYPASS].read_flag(controls),
        }
    }
}

/// One block's multiband settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultibandParams {
    /// Requested split points (sanitised before use).
    pub crossovers: CrossoverFrequencies,
    /// Per-band settings, lowest band first.
    pub bands: [BandParams; BANDS],
    /// Linked stereo detection in every band.
    pub stereo_link: bool,
    /// Output gain in dB.
    pub output_db: f32,
}

impl MultibandParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            crossovers: CrossoverFrequencies {
                low: PARAMS[LOW_FREQ].read(controls),
                mid: PARAMS[MID_FREQ].read(controls),
                high: PARAMS[HIGH_FREQ].read(controls),
            },
            bands: core::array::from_fn(|b| BandParams::from_controls(controls, b)),
            stereo_link: PARAMS[STEREO_LINK].read_flag(controls),
            output_db: PARAMS[OUTPUT].read(controls),
        }
    }
}

impl Default for MultibandParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Phase-compensated four-way LR4 band split.
#[derive(Debug, Clone, Copy)]
pub struct BandSplitter {
    mid: LinkwitzRiley,
    high_phase: LrAllpass,
    low_phase: LrAllpass,
    low: LinkwitzRiley,
    high: LinkwitzRiley,
}

impl BandSplitter {
    /// A splitter at `freqs` (sanitised).
    pub fn new(freqs: CrossoverFrequencies, sample_rate: f64) -> Self {
        let f = freqs.sanitized();
        Self {
            mid: LinkwitzRiley::new(f.mid, sample_rate),
            high_phase: LrAllpass::new(f.high, sample_rate),
            low_phase: LrAllpass::new(f.low, sample_rate),
            low: LinkwitzRiley::new(f.low, sample_rate),
            high: LinkwitzRiley::new(f.high, sample_rate),
        }
    }

    /// Move the split points (sanitised). State is kept.
    pub fn set_frequencies(&mut self, freqs: CrossoverFrequencies, sample_rate: f64) {
        let f = freqs.sanitized();
        self.mid.set_frequency(f.mid, sample_rate);
        self.high_phase.set_frequency(f.high, sample_rate);
        self.low_phase.set_frequency(f.low, sample_rate);
        self.low.set_frequency(f.low, sample_rate);
        self.high.set_frequency(f.high, sample_rate);
    }

    /// Split one sample on `channel` into four bands, lowest first.
    #[inline]
    pub fn split(&mut self, channel: usize, input: f32) -> [f32; BANDS] {
        let (lower, upper) = self.mid.split(channel, input);
        let lower = self.high_phase.process(channel, lower);
        let upper = self.low_phase.process(channel, upper);
        let (b1, b2) = self.low.split(channel, lower);
        let (b3, b4) = self.high.split(channel, upper);
        [b1, b2, b3, b4]
    }

    /// Clear all filter state.
    pub fn reset(&mut self) {
        self.mid.reset();
        self.high_phase.reset();
        self.low_phase.reset();
        self.low.reset();
        self.high.reset();
    }
}

/// Stereo four-band compressor.
#[derive(Debug, Clone)]
pub struct Multiband {
    spec: ProcessSpec,
    splitter: BandSplitter,
    envelopes: [StereoEnvelope; BANDS],
    meter: ReductionMeter<{ BANDS * 2 }>,
}

impl Default for Multiband {
    fn default() -> Self {
        Self::new()
    }
}

impl Multiband {
    /// An unprepared multiband compressor.
    pub fn new() -> Self {
        Self {
            spec: ProcessSpec::UNPREPARED,
            splitter: BandSplitter::new(CrossoverFrequencies::DEFAULT, 48000.0),
            envelopes: [StereoEnvelope::new(); BANDS],
            meter: ReductionMeter::new(),
        }
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &MultibandParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let sr = self.spec.sample_rate;

        self.splitter.set_frequencies(params.crossovers, sr);
        let link = StereoLink::from_flag(params.stereo_link);
        let ballistics = params
            .bands
            .map(|b| Ballistics::from_times_ms(b.attack_ms, b.release_ms, sr));
        let curves = params
            .bands
            .map(|b| CompressorCurve::new(b.threshold_db, b.ratio, 0.0, b.makeup_db));
        let any_solo = params.bands.iter().any(|b| b.solo);
        let audible = params.bands.map(|b| !any_solo || b.solo);
        let output = db_to_linear(params.output_db);

        self.meter.begin_block();
        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            let mut bands = [self.splitter.split(0, *l), self.splitter.split(1, *r)];
            let mut sum = [0.0_f32; 2];

            for band in 0..BANDS {
                let levels = self.envelopes[band].process(
                    bands[0][band],
                    bands[1][band],
                    link,
                    &ballistics[band],
                );
                for ch in 0..2 {
                    if !params.bands[band].bypass {
                        let level_db = linear_to_db(levels[ch]);
                        self.meter
                            .record(band * 2 + ch, curves[band].reduction_db(level_db));
                        bands[ch][band] *= curves[band].gain(level_db);
                    }
                    if audible[band] {
                        sum[ch] += bands[ch][band];
                    }
                }
            }

            *l = sum[0] * output;
            *r = sum[1] * output;
        }
        self.meter.finish_block();
    }
}

impl Processor for Multiband {
    fn name(&self) -> &'static str {
        "multiband"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        self.meter.readout()
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        self.splitter
            .set_frequencies(CrossoverFrequencies::DEFAULT, spec.sample_rate);
        self.reset();
    }

    fn reset(&mut self) {
        self.splitter.reset();
        for e in &mut self.envelopes {
            e.reset();
        }
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = MultibandParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
