//! Freeverb building blocks: damped feedback combs and Schroeder allpasses.
//!
//! Both use a fixed-length ring indexed directly, so a line of length `N`
//! delays by exactly `N` samples.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::math::flush_denormal;

/// Feedback comb with a one-pole lowpass in the loop.
///
/// # Example
///
/// ```rust
/// use ballista_core::CombFilter;
///
/// let mut comb = CombFilter::new(100);
/// comb.set_feedback(0.8);
/// comb.set_damp(0.3);
/// assert_eq!(comb.process(1.0), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damp: f32,
    filter_store: f32,
}

impl CombFilter {
    /// A comb of `delay_samples` (at least 1).
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback: 0.5,
            damp: 0.0,
            filter_store: 0.0,
        }
    }

    /// Loop gain, clamped to `[0, 0.99]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    /// High-frequency damping in `[0, 1]`; 0 is bright.
    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.filter_store = flush_denormal(output * (1.0 - self.damp) + self.filter_store * self.damp);
        self.buffer[self.index] = input + self.filter_store * self.feedback;
        self.index += 1;
        if self.index == self.buffer.len() {
            self.index = 0;
        }
        output
    }

    /// Zero the line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.filter_store = 0.0;
        self.index = 0;
    }

    /// Delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a comb holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Schroeder allpass for diffusion.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// An allpass of `delay_samples` (at least 1) with feedback 0.5.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback: 0.5,
        }
    }

    /// Diffusion coefficient, clamped to `[-0.99, 0.99]`.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];
        self.buffer[self.index] = flush_denormal(input + delayed * self.feedback);
        self.index += 1;
        if self.index == self.buffer.len() {
            self.index = 0;
        }
        delayed - input
    }

    /// Zero the line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comb_echo_spacing() {
        let mut comb = CombFilter::new(100);
        comb.set_feedback(0.5);
        let mut out = Vec::new();
        out.push(comb.process(1.0));
        for _ in 0..300 {
            out.push(comb.process(0.0));
        }
        assert_eq!(out[100], 1.0);
        assert!((out[200] - 0.5).abs() < 1e-6);
        assert!((out[300] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_comb_damping_darkens() {
        let mut bright = CombFilter::new(10);
        let mut dark = CombFilter::new(10);
        bright.set_feedback(0.9);
        dark.set_feedback(0.9);
        dark.set_damp(0.8);
        bright.process(1.0);
        dark.process(1.0);
        let mut eb = 0.0;
        let mut ed = 0.0;
        for _ in 0..200 {
            eb += bright.process(0.0).abs();
            ed += dark.process(0.0).abs();
        }
        assert!(ed < eb);
    }

    #[test]
    fn test_allpass_energy() {
        let mut ap = AllpassFilter::new(37);
        let mut energy = 0.0;
        energy += ap.process(1.0).powi(2);
        for _ in 0..20000 {
            energy += ap.process(0.0).powi(2);
        }
        // Freeverb's allpass is only approximately allpass (gain 1 + g at DC).
        assert!(energy > 0.5 && energy < 2.5, "{energy}");
    }
}
