//! Utility gain stage: width, pan, gain, polarity and mute.
//!
//! Order per sample: mid/side width, constant-power pan, gain (zero when
//! muted), per-channel polarity.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `gain` | -48 to 24 dB | 0 |
//! | `pan` | ±100 % | 0 |
//! | `width` | 0-200 % | 100 |
//! | `invert_left` | toggle | off |
//! | `invert_right` | toggle | off |
//! | `mute` | toggle | off |

use ballista_core::{
    ControlSurface, Defaults, ParamDescriptor, ParamUnit, ProcessSpec, Processor, StereoBlock,
    constant_power_pan, db_to_linear,
};

const GAIN: usize = 0;
const PAN: usize = 1;
const WIDTH: usize = 2;
const INVERT_LEFT: usize = 3;
const INVERT_RIGHT: usize = 4;
const MUTE: usize = 5;

/// Gain controls.
pub static PARAMS: [ParamDescriptor; 6] = [
    ParamDescriptor::gain_db("gain", "Gain", -48.0, 24.0, 0.0),
    ParamDescriptor::float("pan", "Pan", ParamUnit::Percent, -100.0, 100.0, 0.0).with_step(1.0),
    ParamDescriptor::float("width", "Width", ParamUnit::Percent, 0.0, 200.0, 100.0).with_step(1.0),
    ParamDescriptor::toggle("invert_left", "Invert L", false),
    ParamDescriptor::toggle("invert_right", "Invert R", false),
    ParamDescriptor::toggle("mute", "Mute", false),
];

/// One block's gain settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainParams {
    /// Gain in dB.
    pub gain_db: f32,
    /// Pan in percent, negative is left.
    pub pan: f32,
    /// Stereo width in percent; 0 is mono, 100 unchanged.
    pub width: f32,
    /// Flip the left polarity.
    pub invert_left: bool,
    /// Flip the right polarity.
    pub invert_right: bool,
    /// Silence the output.
    pub mute: bool,
}

impl GainParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            gain_db: PARAMS[GAIN].read(controls),
            pan: PARAMS[PAN].read(controls),
            width: PARAMS[WIDTH].read(controls),
            invert_left: PARAMS[INVERT_LEFT].read_flag(controls),
            invert_right: PARAMS[INVERT_RIGHT].read_flag(controls),
            mute: PARAMS[MUTE].read_flag(controls),
        }
    }

    /// Final per-channel multipliers after pan, gain, mute and polarity.
    fn channel_gains(&self) -> [f32; 2] {
        let gain = if self.mute { 0.0 } else { db_to_linear(self.gain_db) };
        let (pan_l, pan_r) = constant_power_pan(self.pan / 100.0);
        let sign = |invert: bool| if invert { -1.0 } else { 1.0 };
        [
            pan_l * gain * sign(self.invert_left),
            pan_r * gain * sign(self.invert_right),
        ]
    }
}

impl Default for GainParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo utility gain.
#[derive(Debug, Clone, Default)]
pub struct Gain {
    spec: ProcessSpec,
}

impl Gain {
    /// An unprepared gain stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &GainParams, block: StereoBlock<'_>) {
        let block = block.limit(&self.spec);
        let width = params.width / 100.0;
        let [gain_l, gain_r] = params.channel_gains();

        for (l, r) in block.left.iter_mut().zip(block.right.iter_mut()) {
            if width != 1.0 {
                let mid = 0.5 * (*l + *r);
                let side = 0.5 * (*l - *r) * width;
                *l = mid + side;
                *r = mid - side;
            }
            *l *= gain_l;
            *r *= gain_r;
        }
    }
}

impl Processor for Gain {
    fn name(&self) -> &'static str {
        "gain"
    }

    fn params(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    fn meters(&self) -> &[f32] {
        &[]
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.spec = spec;
    }

    fn reset(&mut self) {}

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = GainParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
