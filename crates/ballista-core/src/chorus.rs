//! Stereo chorus used on delay and reverb wet paths.
//!
//! Each channel runs a short delay swept by its own LFO; the right LFO is a
//! quarter cycle ahead of the left. The chorused signal is blended back in
//! at `depth / 2`, so depth 0 leaves the input untouched.

use crate::delay::{InterpolatedDelay, Interpolation};
use crate::lfo::Lfo;

/// Centre delay of the sweep.
pub const BASE_DELAY_MS: f32 = 7.0;
/// Sweep excursion at full depth.
pub const MAX_EXCURSION_MS: f32 = 3.0;

/// Stereo modulated delay.
#[derive(Debug, Clone, Default)]
pub struct Chorus {
    lines: [InterpolatedDelay; 2],
    lfos: [Lfo; 2],
    sample_rate: f64,
}

impl Chorus {
    /// An unprepared chorus. Call [`prepare`](Self::prepare) first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate delay lines for `sample_rate` and reset. May allocate.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        let max_ms = f64::from(BASE_DELAY_MS + MAX_EXCURSION_MS);
        let len = (max_ms / 1000.0 * sample_rate) as usize + 4;
        for line in &mut self.lines {
            *line = InterpolatedDelay::new(len);
            line.set_interpolation(Interpolation::Cubic);
        }
        self.reset();
    }

    /// Set the sweep rate in Hz.
    pub fn set_rate(&mut self, rate_hz: f32) {
        for lfo in &mut self.lfos {
            lfo.set_frequency(rate_hz, self.sample_rate);
        }
    }

    /// Process a stereo block in place. `depth` is in `[0, 1]`.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32], depth: f32) {
        let depth = depth.clamp(0.0, 1.0);
        let blend = 0.5 * depth;
        let ms_to_samples = (self.sample_rate / 1000.0) as f32;

        for (ch, buf) in [left, right].into_iter().enumerate() {
            let line = &mut self.lines[ch];
            let lfo = &mut self.lfos[ch];
            for x in buf.iter_mut() {
                let sweep = BASE_DELAY_MS + depth * MAX_EXCURSION_MS * lfo.next();
                line.write(*x);
                if blend > 0.0 {
                    let wet = line.read(sweep * ms_to_samples);
                    *x += blend * (wet - *x);
                }
            }
        }
    }

    /// Clear the lines and re-phase the LFOs.
    pub fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.lfos[0].set_phase(0.0);
        self.lfos[1].set_phase(0.25);
    }
}
