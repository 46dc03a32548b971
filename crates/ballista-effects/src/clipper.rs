//! Hard clipper with auto-gain and output ceiling.
//!
//! No envelope: every sample is clipped to `±threshold`, raised back by
//! `-threshold` when auto-gain is on, then scaled to the ceiling.
//!
//! # Parameters
//!
//! | Key | Range | Default |
//! |-----|-------|---------|
//! | `threshold` | -24 to 0 dB | -6 |
//! | `ceiling` | -12 to 0 dB | 0 |
//! | `auto_gain` | toggle | on |

use ballista_core::{
    ClipperCurve, ControlSurface, Defaults, ParamDescriptor, ProcessSpec, Processor,
    ReductionMeter, StereoBlock,
};

const THRESHOLD: usize = 0;
const CEILING: usize = 1;
const AUTO_GAIN: usize = 2;

/// Clipper controls.
pub static PARAMS: [ParamDescriptor; 3] = [
    ParamDescriptor::gain_db("threshold", "Threshold", -24.0, 0.0, -6.0),
    ParamDescriptor::gain_db("ceiling", "Ceiling", -12.0, 0.0, 0.0),
    ParamDescriptor::toggle("auto_gain", "Auto Gain", true),
];

/// One block's clipper settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipperParams {
    /// Clip point in dB.
    pub threshold_db: f32,
    /// Output ceiling in dB.
    pub ceiling_db: f32,
    /// Compensate the clip point back to 0 dBFS.
    pub auto_gain: bool,
}

impl ClipperParams {
    /// Snapshot the controls.
    pub fn from_controls(controls: &dyn ControlSurface) -> Self {
        Self {
            threshold_db: PARAMS[THRESHOLD].read(controls),
            ceiling_db: PARAMS[CEILING].read(controls),
            auto_gain: PARAMS[AUTO_GAIN].read_flag(controls),
        }
    }
}

impl Default for ClipperParams {
    fn default() -> Self {
        Self::from_controls(&Defaults)
    }
}

/// Stereo hard clipper.
#[derive(Debug, Clone, Default)]
pub struct Clipper {
    spec: ProcessSpec,
    meter: ReductionMeter<2>,
}

impl Clipper {
    /// An unprepared clipper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a block with explicit settings.
    pub fn process_with(&mut self, params: &ClipperParams, block: StereoBlock<'_>) {
        let mut block = block.limit(&self.spec);
        let curve = ClipperCurve::new(params.threshold_db, params.ceiling_db, params.auto_gain);

        self.meter.begin_block();
        for (ch, buf) in block.channels().into_iter().enumerate() {
            for x in buf.iter_mut() {
                let (y, reduction) = curve.process(*x);
                self.meter.record(ch, reduction);
                *x = y;
            }
        }
        self.meter.finish_block();
    }
}

impl Processor for Clipper {
    fn name(&self) -> &'static str {
        "clipper"
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
        self.meter.reset();
    }

    fn process(&mut self, controls: &dyn ControlSurface, block: StereoBlock<'_>) {
        let params = ClipperParams::from_controls(controls);
        self.process_with(&params, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_and_meter() {
        let mut c = Clipper::new();
        c.prepare(ProcessSpec::stereo(48000.0, 4));
        let mut l = [1.0_f32, -1.0, 0.25, 0.0];
        let mut r = [0.1_f32; 4];
        c.process(&Defaults, StereoBlock::new(&mut l, &mut r));

        assert!((l[0] - 1.0).abs() < 1e-5);
        assert!((l[1] + 1.0).abs() < 1e-5);
        assert!(l[2] > 0.25);
        assert_eq!(l[3], 0.0);
        let m = c.meters();
        assert!((m[0] - 6.0).abs() < 1e-3, "{m:?}");
        assert_eq!(m[1], 0.0);
    }

    #[test]
    fn test_without_auto_gain_peaks_sit_at_threshold() {
        let mut c = Clipper::new();
        c.prepare(ProcessSpec::stereo(48000.0, 2));
        let params = ClipperParams {
            threshold_db: -12.0,
            ceiling_db: 0.0,
            auto_gain: false,
        };
        let mut l = [2.0_f32, -2.0];
        let mut r = [0.0_f32; 2];
        c.process_with(&params, StereoBlock::new(&mut l, &mut r));
        let t = ballista_core::db_to_linear(-12.0);
        assert!((l[0] - t).abs() < 1e-6);
        assert!((l[1] + t).abs() < 1e-6);
    }
}
