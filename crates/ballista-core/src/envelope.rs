//! Envelope followers and attack/release ballistics.
//!
//! Every dynamics processor tracks level with the same one-pole blend:
//!
//! ```text
//! env = c * env + (1 - c) * x      c = attack if x > env, else release
//! ```
//!
//! The coefficients live in [`Ballistics`] and are recomputed once per block
//! from millisecond times. The followers themselves only hold state, so the
//! same coefficients drive every channel (or band) of a processor.

use crate::math::time_constant;

/// Attack and release smoothing coefficients.
///
/// A coefficient of `0.0` follows the input instantly; values close to `1.0`
/// move slowly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistics {
    /// Coefficient used while the input is above the envelope.
    pub attack: f32,
    /// Coefficient used while the input is at or below the envelope.
    pub release: f32,
}

impl Ballistics {
    /// Coefficients for attack and release times in milliseconds.
    pub fn from_times_ms(attack_ms: f32, release_ms: f32, sample_rate: f64) -> Self {
        Self {
            attack: time_constant(attack_ms, sample_rate),
            release: time_constant(release_ms, sample_rate),
        }
    }

    /// Limiter-style ballistics: the attack branch snaps to the input.
    pub fn instant_attack(release_ms: f32, sample_rate: f64) -> Self {
        Self {
            attack: 0.0,
            release: time_constant(release_ms, sample_rate),
        }
    }
}

impl Default for Ballistics {
    fn default() -> Self {
        Self {
            attack: 0.0,
            release: 0.0,
        }
    }
}

/// Single-channel peak envelope follower.
///
/// # Example
///
/// ```rust
/// use ballista_core::{Ballistics, EnvelopeFollower};
///
/// let ballistics = Ballistics::from_times_ms(10.0, 100.0, 48000.0);
/// let mut env = EnvelopeFollower::new();
///
/// let level = env.process(0.5, &ballistics);
/// assert!(level > 0.0 && level < 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeFollower {
    level: f32,
}

impl EnvelopeFollower {
    /// Create a follower resting at zero.
    pub const fn new() -> Self {
        Self { level: 0.0 }
    }

    /// Advance by one sample of rectified input and return the new level.
    #[inline]
    pub fn process(&mut self, input_abs: f32, ballistics: &Ballistics) -> f32 {
        let coeff = if input_abs > self.level {
            ballistics.attack
        } else {
            ballistics.release
        };
        self.level = coeff * self.level + (1.0 - coeff) * input_abs;
        self.level
    }

    /// Current level without advancing.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Return to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// How a stereo detector combines its two channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StereoLink {
    /// The louder channel drives one shared envelope applied to both.
    #[default]
    Linked,
    /// Each channel tracks its own level.
    DualMono,
}

impl StereoLink {
    /// Map a toggle control (`true` = linked).
    pub fn from_flag(linked: bool) -> Self {
        if linked { Self::Linked } else { Self::DualMono }
    }
}

/// Two followers with linked or independent detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct StereoEnvelope {
    followers: [EnvelopeFollower; 2],
}

impl StereoEnvelope {
    /// Create a stereo detector resting at zero.
    pub const fn new() -> Self {
        Self {
            followers: [EnvelopeFollower::new(); 2],
        }
    }

    /// Advance both channels by one sample.
    ///
    /// Inputs are raw samples; rectification happens here.
    #[inline]
    pub fn process(
        &mut self,
        left: f32,
        right: f32,
        link: StereoLink,
        ballistics: &Ballistics,
    ) -> [f32; 2] {
        match link {
            StereoLink::Linked => {
                let level = self.followers[0].process(left.abs().max(right.abs()), ballistics);
                // Keep the second state in step so switching modes is seamless.
                self.followers[1] = self.followers[0];
                [level, level]
            }
            StereoLink::DualMono => [
                self.followers[0].process(left.abs(), ballistics),
                self.followers[1].process(right.abs(), ballistics),
            ],
        }
    }

    /// Current levels.
    pub fn levels(&self) -> [f32; 2] {
        [self.followers[0].level(), self.followers[1].level()]
    }

    /// Return both channels to zero.
    pub fn reset(&mut self) {
        for f in &mut self.followers {
            f.reset();
        }
    }
}

/// Gate gain state with attack, hold and release.
///
/// The ballistics apply to the gain target itself rather than to the
/// detected level. While the target sits below the state, release is held
/// off for `hold_samples`; a target at or above the state resets the hold
/// counter, so a gate that stays open does not use up its hold time.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldEnvelope {
    state: f32,
    held: u32,
}

impl HoldEnvelope {
    /// Create a closed gate state.
    pub const fn new() -> Self {
        Self { state: 0.0, held: 0 }
    }

    /// Advance by one sample towards `target` and return the new state.
    #[inline]
    pub fn process(&mut self, target: f32, ballistics: &Ballistics, hold_samples: u32) -> f32 {
        if target >= self.state {
            self.held = 0;
            self.state = ballistics.attack * self.state + (1.0 - ballistics.attack) * target;
        } else if self.held < hold_samples {
            self.held += 1;
        } else {
            self.state = ballistics.release * self.state + (1.0 - ballistics.release) * target;
        }
        self.state
    }

    /// Current gain state.
    pub fn state(&self) -> f32 {
        self.state
    }

    /// Samples spent holding since the last attack.
    pub fn held_samples(&self) -> u32 {
        self.held
    }

    /// Close the gate and clear the hold counter.
    pub fn reset(&mut self) {
        self.state = 0.0;
        self.held = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_converges_within_five_tau() {
        let sr = 48000.0;
        let attack_ms = 10.0;
        let b = Ballistics::from_times_ms(attack_ms, 100.0, sr);
        let mut env = EnvelopeFollower::new();

        let tau = (attack_ms / 1000.0 * sr as f32) as usize;
        let mut prev = 0.0;
        for _ in 0..5 * tau {
            let level = env.process(1.0, &b);
            assert!(level > prev, "envelope must rise strictly");
            prev = level;
        }
        assert!((1.0 - prev) < 0.01, "after 5 tau level was {prev}");
    }

    #[test]
    fn test_release_decays() {
        let b = Ballistics::from_times_ms(1.0, 50.0, 48000.0);
        let mut env = EnvelopeFollower::new();
        for _ in 0..4800 {
            env.process(1.0, &b);
        }
        let peak = env.level();
        let mut prev = peak;
        for _ in 0..100 {
            let level = env.process(0.0, &b);
            assert!(level < prev);
            prev = level;
        }
    }

    #[test]
    fn test_instant_attack() {
        let b = Ballistics::instant_attack(50.0, 48000.0);
        let mut env = EnvelopeFollower::new();
        assert_eq!(env.process(0.8, &b), 0.8);
        assert!(env.process(0.2, &b) < 0.8);
    }

    #[test]
    fn test_linked_uses_louder_channel() {
        let b = Ballistics::instant_attack(50.0, 48000.0);
        let mut env = StereoEnvelope::new();
        let [l, r] = env.process(0.1, -0.9, StereoLink::Linked, &b);
        assert_eq!(l, 0.9);
        assert_eq!(r, 0.9);
    }

    #[test]
    fn test_dual_mono_independent() {
        let b = Ballistics::instant_attack(50.0, 48000.0);
        let mut env = StereoEnvelope::new();
        let [l, r] = env.process(0.1, -0.9, StereoLink::DualMono, &b);
        assert_eq!(l, 0.1);
        assert_eq!(r, 0.9);
    }

    #[test]
    fn test_hold_suppresses_release() {
        let b = Ballistics::from_times_ms(0.0, 1.0, 48000.0);
        let mut gate = HoldEnvelope::new();
        assert_eq!(gate.process(1.0, &b, 10), 1.0);

        for _ in 0..10 {
            assert_eq!(gate.process(0.0, &b, 10), 1.0);
        }
        assert!(gate.process(0.0, &b, 10) < 1.0);
    }

    #[test]
    fn test_attack_resets_hold() {
        let b = Ballistics::from_times_ms(0.0, 1.0, 48000.0);
        let mut gate = HoldEnvelope::new();
        gate.process(0.5, &b, 4);
        gate.process(0.0, &b, 4);
        gate.process(0.0, &b, 4);
        assert_eq!(gate.held_samples(), 2);
        gate.process(1.0, &b, 4);
        assert_eq!(gate.held_samples(), 0);
    }

    #[test]
    fn test_open_gate_keeps_hold() {
        let b = Ballistics::from_times_ms(0.0, 1.0, 48000.0);
        let mut gate = HoldEnvelope::new();
        for _ in 0..100 {
            gate.process(1.0, &b, 4);
        }
        assert_eq!(gate.held_samples(), 0);
        for _ in 0..4 {
            assert_eq!(gate.process(0.0, &b, 4), 1.0);
        }
    }

    #[test]
    fn test_reset() {
        let b = Ballistics::from_times_ms(1.0, 10.0, 48000.0);
        let mut env = StereoEnvelope::new();
        env.process(1.0, 1.0, StereoLink::Linked, &b);
        env.reset();
        assert_eq!(env.levels(), [0.0, 0.0]);
    }
}
