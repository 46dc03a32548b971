//! Tilt equalizer: opposing shelves around one pivot.
//!
//! A low shelf at `-tilt/2` and a high shelf at `+tilt/2`, both at the pivot
//! with Q 1.0, so positive tilt brightens and negative tilt darkens while the
//! pivot itself stays close to unity.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `tilt` | ±12 dB | 0 |
//! | `pivot` | 200-5000 Hz | 1000 |
//! | `output` | ±24 dB | 0 |

use ballista_core::{
    ControlSurface, Defaults, FilterDesign, FilterPipeline, ParamDescriptor, ProcessSpec,
    Processor, StereoBlock, db_to_linear,
};

const SHELF_Q: f32 = 1.0;

const TILT: usize = 0;
const PIVOT: usize = 1;
const OUTPUT: usize = 2;

/// Tilt EQ controls.
pub static PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::gain_db("tilt", "Tilt", -12.0, 12.0, 0.0),
    ParamDescriptor::frequency_hz("pivot", "Pivot", 200.0, 5000.0, 1000.0),
    ParamDescriptor::gain_db("output", "Output", -24.0, 24.0, 0.0),
];

/// One block's tilt settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltEqParams {
    /// Total tilt in dB, split evenly between the shelves.
    pub tilt_db: f32,
    /// Pivot in Hz.
    pub pivot: f32,
    /// Output gain in dB.
    pub output_db: f32,
}

impl TiltEqParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            tilt_db: PARAMS[TILT].read(controls),
            pivot: PARAMS[PIVOT].read(controls),
            output_db: PARAMS[OUTPUT].read(controls),
        }
    }

    fn designs(&self) -> [FilterDesign; 2] {
        let half = self.tilt_db / 2.0;
        [
            FilterDesign::LowShelf {
                freq: self.pivot,
                q: SHELF_Q,
                gain_db: -half,
            },
            FilterDesign::HighShelf {
                freq: self.pivot,
                q: SHELF_Q,
                gain_db: half,
            },
        ]
    }
}

impl Default for TiltEqParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo tilt EQ.
#[derive(Debug, Clone, Default)]
pub struct TiltEq {
    spec: ProcessSpec,
    shelves: FilterPipeline<2>,
}

impl TiltEq {
    /// An unprepared, flat tilt EQ.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &TiltEqParams, block: StereoBlock<'_>) {
        let mut block = block.limit(&self.spec);
        self.shelves.set_designs(params.designs(), self.spec.sample_rate);

        let output = db_to_linear(params.output_db);
        let [left, right] = block.channels();
        self.shelves.process_block(left, right);
        for x in left.iter_mut().chain(right.iter_mut()) {
            *x *= output;
        }
    }
}

impl Processor for TiltEq {
    fn name(&self) -> &'static str {
        "tilt_eq"
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
        self.shelves.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = TiltEqParams::from_controls(controls);
        self.process_with(&params, block);
    }
}
