//! Freeverb-style stereo reverb with predelay, tone and chorus.
//!
//! ```text
//! Input ─┬─► predelay ring ─► (L+R)·gain ─► 8 combs ∥ ─► 4 allpasses ─► width
//!        │                                                               │
//!        │                           chorus ◄─ [HPF → LPF] ◄─────────────┘
//!        │                              │
//!        └──────────────────────────────┴─► equal-power mix ─► Output
//! ```
//!
//! Comb and allpass lengths are the Freeverb tunings at 44.1 kHz, rescaled to
//! the prepared rate; the right channel's lines are 23 samples longer.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `size` | 0-100 % | 50 |
//! | `damping` | 0-100 % | 50 |
//! | `width` | 0-100 % | 100 |
//! | `predelay` | 0-200 ms | 10 |
//! | `lowcut` | 20-1000 Hz | 100 |
//! | `highcut` | 1-20 kHz | 12 kHz |
//! | `mod_rate` | 0.05-5 Hz | 0.5 |
//! | `mod_depth` | 0-100 % | 20 |
//! | `mix` | 0-100 % | 30 |

use ballista_core::{
    AllpassFilter, BUTTERWORTH_Q, Chorus, CombFilter, ControlSurface, Defaults, DelayBuffer,
    FilterDesign, FilterPipeline, ParamDescriptor, ParamScale, ParamUnit, ProcessSpec, Processor,
    StereoBlock, StereoBuffer, mix_into, ms_to_samples,
};

const COMB_TUNINGS: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNINGS: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const TUNING_RATE: f64 = 44100.0;

const FIXED_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const ALLPASS_FEEDBACK: f32 = 0.5;

/// Longest predelay in ms.
pub const MAX_PREDELAY_MS: f32 = 200.0;

const SIZE: usize = 0;
const DAMPING: usize = 1;
const WIDTH: usize = 2;
const PREDELAY: usize = 3;
const LOWCUT: usize = 4;
const HIGHCUT: usize = 5;
const MOD_RATE: usize = 6;
const MOD_DEPTH: usize = 7;
const MIX: usize = 8;

/// Reverb controls.
pub static PARAMS: [ParamDescriptor; 9] = [
    ParamDescriptor::percent("size", "Size", 50.0),
    ParamDescriptor::percent("damping", "Damping", 50.0),
    ParamDescriptor::percent("width", "Width", 100.0),
    ParamDescriptor::float("predelay", "Predelay", ParamUnit::Milliseconds, 0.0, MAX_PREDELAY_MS, 10.0)
        .with_step(0.1),
    ParamDescriptor::frequency_hz("lowcut", "Low Cut", 20.0, 1000.0, 100.0).with_group("Tone"),
    ParamDescriptor::frequency_hz("highcut", "High Cut", 1000.0, 20000.0, 12000.0)
        .with_group("Tone"),
    ParamDescriptor::float("mod_rate", "Mod Rate", ParamUnit::Hertz, 0.05, 5.0, 0.5)
        .with_scale(ParamScale::Logarithmic)
        .with_group("Modulation"),
    ParamDescriptor::percent("mod_depth", "Mod Depth", 20.0).with_group("Modulation"),
    ParamDescriptor::percent("mix", "Mix", 30.0),
];

/// One block's reverb settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    /// Room size in percent (comb feedback).
    pub size: f32,
    /// High-frequency damping in percent.
    pub damping: f32,
    /// Stereo width in percent.
    pub width: f32,
    /// Predelay in ms.
    pub predelay_ms: f32,
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

impl ReverbParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            size: PARAMS[SIZE].read(controls),
            damping: PARAMS[DAMPING].read(controls),
            width: PARAMS[WIDTH].read(controls),
            predelay_ms: PARAMS[PREDELAY].read(controls),
            lowcut: PARAMS[LOWCUT].read(controls),
            highcut: PARAMS[HIGHCUT].read(controls),
            mod_rate: PARAMS[MOD_RATE].read(controls),
            mod_depth: PARAMS[MOD_DEPTH].read(controls),
            mix: PARAMS[MIX].read(controls),
        }
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

fn scale_tuning(samples: usize, sample_rate: f64) -> usize {
    (libm::round(samples as f64 * sample_rate / TUNING_RATE) as usize).max(1)
}

/// One channel of the Freeverb tank.
#[derive(Debug, Clone)]
struct Tank {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Tank {
    fn new(sample_rate: f64, spread: usize) -> Self {
        Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scale_tuning(COMB_TUNINGS[i] + spread, sample_rate))
            }),
            allpasses: core::array::from_fn(|i| {
                let mut ap = AllpassFilter::new(scale_tuning(ALLPASS_TUNINGS[i] + spread, sample_rate));
                ap.set_feedback(ALLPASS_FEEDBACK);
                ap
            }),
        }
    }

    fn set_room(&mut self, feedback: f32, damp: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let sum: f32 = self.combs.iter_mut().map(|c| c.process(input)).sum();
        self.allpasses.iter_mut().fold(sum, |x, ap| ap.process(x))
    }

    fn clear(&mut self) {
        for c in &mut self.combs {
            c.clear();
        }
        for ap in &mut self.allpasses {
            ap.clear();
        }
    }
}

/// Stereo reverb.
#[derive(Debug, Clone)]
pub struct Reverb {
    spec: ProcessSpec,
    predelay: DelayBuffer,
    wet: StereoBuffer,
    tanks: [Tank; 2],
    tone: FilterPipeline<2>,
    chorus: Chorus,
}

impl Default for Reverb {
    fn default() -> Self {
        Self::new()
    }
}

impl Reverb {
    /// An unprepared reverb. `prepare` sizes the lines for the sample rate.
    pub fn new() -> Self {
        Self {
            spec: ProcessSpec::UNPREPARED,
            predelay: DelayBuffer::new(),
            wet: StereoBuffer::default(),
            tanks: [Tank::new(TUNING_RATE, 0), Tank::new(TUNING_RATE, STEREO_SPREAD)],
            tone: FilterPipeline::new(),
            chorus: Chorus::new(),
        }
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &ReverbParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let n = block.len();
        let sr = self.spec.sample_rate;

        let feedback = params.size / 100.0 * ROOM_SCALE + ROOM_OFFSET;
        let damp = params.damping / 100.0 * DAMP_SCALE;
        for tank in &mut self.tanks {
            tank.set_room(feedback, damp);
        }
        let width = params.width / 100.0;
        let wet1 = WET_SCALE * (width / 2.0 + 0.5);
        let wet2 = WET_SCALE * ((1.0 - width) / 2.0);

        let (wet_l, wet_r) = self.wet.split_mut(n);
        let delay = ms_to_samples(params.predelay_ms, sr);
        self.predelay.write_block(0, block.left);
        self.predelay.write_block(1, block.right);
        self.predelay.read_block(0, delay, wet_l);
        self.predelay.read_block(1, delay, wet_r);
        self.predelay.advance(n);

        let [tank_l, tank_r] = &mut self.tanks;
        for (l, r) in wet_l.iter_mut().zip(wet_r.iter_mut()) {
            let input = (*l + *r) * FIXED_GAIN;
            let out_l = tank_l.process(input);
            let out_r = tank_r.process(input);
            *l = out_l * wet1 + out_r * wet2;
            *r = out_r * wet1 + out_l * wet2;
        }

        self.tone.set_designs(
            [
                FilterDesign::Highpass {
                    freq: params.lowcut,
                    q: BUTTERWORTH_Q,
                },
                FilterDesign::Lowpass {
                    freq: params.highcut,
                    q: BUTTERWORTH_Q,
                },
            ],
            sr,
        );
        self.tone.process_block(wet_l, wet_r);

        self.chorus.set_rate(params.mod_rate);
        self.chorus.process_block(wet_l, wet_r, params.mod_depth / 100.0);

        let mix = params.mix / 100.0;
        mix_into(block.left, wet_l, mix);
        mix_into(block.right, wet_r, mix);
    }
}

impl Processor for Reverb {
    fn name(&self) -> &'static str {
        "reverb"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        &[]
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
        let sr = spec.sample_rate;
        self.predelay.allocate(DelayBuffer::capacity_for(
            ms_to_samples(MAX_PREDELAY_MS, sr),
            spec.max_block_size,
        ));
        self.wet.resize(spec.max_block_size);
        self.tanks = [Tank::new(sr, 0), Tank::new(sr, STEREO_SPREAD)];
        self.chorus.prepare(sr);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = sr,
            first_comb = self.tanks[0].combs[0].len(),
            "reverb prepared"
        );
        self.reset();
    }

    fn reset(&mut self) {
        self.predelay.clear();
        self.wet.clear();
        for tank in &mut self.tanks {
            tank.clear();
        }
        self.tone.reset();
        self.chorus.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = ReverbParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
