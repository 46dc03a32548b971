//! Low-frequency sine oscillator for delay modulation.

use core::f32::consts::TAU;
use libm::sinf;

/// Phase-accumulator sine LFO producing values in `[-1, 1]`.
///
/// # Example
///
/// ```rust
/// use ballista_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 2.0);
/// let value = lfo.next();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lfo {
    phase: f32,
    phase_inc: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// An LFO at `freq_hz`, starting at phase 0.
    pub fn new(sample_rate: f64, freq_hz: f32) -> Self {
        let mut lfo = Self {
            phase: 0.0,
            phase_inc: 0.0,
        };
        lfo.set_frequency(freq_hz, sample_rate);
        lfo
    }

    /// Set the rate in Hz.
    pub fn set_frequency(&mut self, freq_hz: f32, sample_rate: f64) {
        self.phase_inc = if sample_rate > 0.0 {
            (f64::from(freq_hz.max(0.0)) / sample_rate) as f32
        } else {
            0.0
        };
    }

    /// Jump to `phase` in cycles (wrapped into `[0, 1)`).
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase - libm::floorf(phase);
    }

    /// Produce the next value.
    #[inline]
    pub fn next(&mut self) -> f32 {
        let out = sinf(self.phase * TAU);
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period() {
        let mut lfo = Lfo::new(1000.0, 10.0);
        let first = lfo.next();
        for _ in 0..99 {
            lfo.next();
        }
        assert!((lfo.next() - first).abs() < 1e-4);
    }

    #[test]
    fn test_range() {
        let mut lfo = Lfo::new(48000.0, 3.0);
        for _ in 0..48000 {
            let v = lfo.next();
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_set_phase_wraps() {
        let mut lfo = Lfo::default();
        lfo.set_phase(1.25);
        assert!((lfo.next() - 1.0).abs() < 1e-6);
    }
}
