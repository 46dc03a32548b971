//! Equal-power crossfades and panning.
//!
//! A linear dry/wet crossfade dips by 6 dB in the middle for uncorrelated
//! material. The sine/cosine law keeps `dry² + wet² = 1` across the range.

use core::f32::consts::FRAC_PI_2;
use libm::{cosf, sinf};

/// Dry and wet gains for a mix amount in `[0, 1]`.
///
/// Returns `(cos(mix·π/2), sin(mix·π/2))`. Out-of-range input is clamped.
#[inline]
pub fn equal_power_gains(mix: f32) -> (f32, f32) {
    let angle = mix.clamp(0.0, 1.0) * FRAC_PI_2;
    // Exact endpoints so 0 % and 100 % are true bypass / fully wet.
    if angle == 0.0 {
        return (1.0, 0.0);
    }
    if angle == FRAC_PI_2 {
        return (0.0, 1.0);
    }
    (cosf(angle), sinf(angle))
}

/// Blend one dry and one wet sample with precomputed gains.
#[inline]
pub fn equal_power_mix(dry: f32, wet: f32, gains: (f32, f32)) -> f32 {
    dry * gains.0 + wet * gains.1
}

/// Blend a wet block into a dry block in place.
///
/// `dry` receives the mixed result. Both slices must be the same length.
pub fn mix_into(dry: &mut [f32], wet: &[f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());
    let gains = equal_power_gains(mix);
    for (d, &w) in dry.iter_mut().zip(wet) {
        *d = equal_power_mix(*d, w, gains);
    }
}

/// Constant-power pan gains normalised to unity at centre.
///
/// `pan` is in `[-1, 1]` (hard left to hard right). At centre both gains are
/// exactly 1.0; a hard pan yields `(√2, 0)` or `(0, √2)`.
#[inline]
pub fn constant_power_pan(pan: f32) -> (f32, f32) {
    let p = pan.clamp(-1.0, 1.0);
    if p == 0.0 {
        return (1.0, 1.0);
    }
    let angle = (p + 1.0) * core::f32::consts::FRAC_PI_4;
    let norm = core::f32::consts::SQRT_2;
    (cosf(angle) * norm, sinf(angle) * norm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        assert_eq!(equal_power_gains(0.0), (1.0, 0.0));
        assert_eq!(equal_power_gains(1.0), (0.0, 1.0));
        assert_eq!(equal_power_gains(-3.0), (1.0, 0.0));
    }

    #[test]
    fn test_constant_power() {
        for i in 0..=20 {
            let (d, w) = equal_power_gains(i as f32 / 20.0);
            assert!((d * d + w * w - 1.0).abs() < 1e-5);
        }
        let (d, w) = equal_power_gains(0.5);
        assert!((d - w).abs() < 1e-6);
    }

    #[test]
    fn test_mix_into() {
        let mut dry = [1.0_f32; 4];
        let wet = [0.0_f32; 4];
        mix_into(&mut dry, &wet, 0.0);
        assert_eq!(dry, [1.0; 4]);
        mix_into(&mut dry, &wet, 1.0);
        assert_eq!(dry, [0.0; 4]);
    }

    #[test]
    fn test_pan_centre_unity() {
        assert_eq!(constant_power_pan(0.0), (1.0, 1.0));
        let (l, r) = constant_power_pan(-1.0);
        assert!((l - core::f32::consts::SQRT_2).abs() < 1e-5);
        assert!(r.abs() < 1e-5);
    }
}
