//! Level conversions and small numeric helpers shared by every processor.
//!
//! All functions are allocation-free and `no_std` (via `libm`).
//!
//! # Level floor
//!
//! Dynamics code works in decibels. Amplitudes at or below [`MIN_AMPLITUDE`]
//! map to [`MIN_LEVEL_DB`] instead of `-inf`, so silence never produces NaN
//! in a gain computer.

use libm::{exp, expf, logf, round};

/// Floor returned by [`linear_to_db`] for silent or negative input.
pub const MIN_LEVEL_DB: f32 = -120.0;

/// Amplitudes at or below this value are treated as silence.
pub const MIN_AMPLITUDE: f32 = 1e-6;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use ballista_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels, floored at [`MIN_LEVEL_DB`].
///
/// # Example
/// ```rust
/// use ballista_core::{linear_to_db, MIN_LEVEL_DB};
///
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert_eq!(linear_to_db(0.0), MIN_LEVEL_DB);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear.is_nan() || linear <= MIN_AMPLITUDE {
        return MIN_LEVEL_DB;
    }
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    (logf(linear) * FACTOR).max(MIN_LEVEL_DB)
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
///
/// `exp(-1 / (ms / 1000 * sample_rate))`, evaluated in double precision.
/// Non-positive times return `0.0`, which makes the follower jump straight
/// to its input.
#[inline]
pub fn time_constant(time_ms: f32, sample_rate: f64) -> f32 {
    let samples = f64::from(time_ms) / 1000.0 * sample_rate;
    if samples <= 0.0 {
        return 0.0;
    }
    exp(-1.0 / samples) as f32
}

/// Milliseconds to a whole number of samples (rounded).
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f64) -> usize {
    let samples = round(f64::from(ms) / 1000.0 * sample_rate);
    if samples > 0.0 { samples as usize } else { 0 }
}

/// Flush denormal numbers to zero.
///
/// Feedback paths decaying towards silence end up in the subnormal range,
/// which is very slow on many CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Largest `f32` strictly below `x`, for finite positive `x`.
#[inline]
pub fn below(x: f32) -> f32 {
    debug_assert!(x > 0.0 && x.is_finite());
    f32::from_bits(x.to_bits() - 1)
}

/// Smallest `f32` strictly above `x`, for finite positive `x`.
#[inline]
pub fn above(x: f32) -> f32 {
    debug_assert!(x > 0.0 && x.is_finite());
    f32::from_bits(x.to_bits() + 1)
}

/// Replace non-finite values with zero.
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_round_trip() {
        for db in [-60.0_f32, -20.0, -6.0, 0.0, 6.0, 12.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} dB came back as {back}");
        }
    }

    #[test]
    fn test_linear_to_db_floor() {
        assert_eq!(linear_to_db(0.0), MIN_LEVEL_DB);
        assert_eq!(linear_to_db(-1.0), MIN_LEVEL_DB);
        assert_eq!(linear_to_db(f32::NAN), MIN_LEVEL_DB);
        assert_eq!(linear_to_db(MIN_AMPLITUDE), MIN_LEVEL_DB);
        assert!(linear_to_db(1e-5) > MIN_LEVEL_DB);
    }

    #[test]
    fn test_time_constant() {
        // One time constant of 1 ms at 48 kHz is 48 samples.
        let c = time_constant(1.0, 48000.0);
        assert!((c - libm::expf(-1.0 / 48.0)).abs() < 1e-7);
        assert_eq!(time_constant(0.0, 48000.0), 0.0);
        assert_eq!(time_constant(-5.0, 48000.0), 0.0);
    }

    #[test]
    fn test_ms_to_samples() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480);
        assert_eq!(ms_to_samples(0.0, 48000.0), 0);
        assert_eq!(ms_to_samples(-3.0, 48000.0), 0);
    }

    #[test]
    fn test_neighbours() {
        let x = 800.0_f32;
        assert!(below(x) < x);
        assert!(above(x) > x);
        assert_eq!(above(below(x)), x);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
