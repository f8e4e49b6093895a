//! Bilinear-transform biquad designers
//!
//! All three designers pre-warp with `k = w0 / tan(π·f/fs)` where
//! `w0 = 2π·f`. Preconditions (`0 < f < fs/2`, `Q > 0`) are the caller's
//! responsibility; out-of-range input produces non-finite or unstable
//! coefficients rather than being clamped.

use super::BiquadCoefficients;
use std::f64::consts::PI;

/// Analog corner frequency and its bilinear pre-warp constant
fn prewarp(frequency_hz: f64, sample_rate_hz: f64) -> (f64, f64) {
    let w0 = 2.0 * PI * frequency_hz;
    let k = w0 / (PI * frequency_hz / sample_rate_hz).tan();
    (w0, k)
}

/// Second-order low-pass at `cutoff_hz`
///
/// The two poles coincide, so `a2 == a1² / 4`.
#[must_use]
pub fn design_low_pass(cutoff_hz: f64, sample_rate_hz: f64) -> BiquadCoefficients {
    let (w0, k) = prewarp(cutoff_hz, sample_rate_hz);
    let d = w0 + k;
    let b0 = (w0 / d).powi(2);
    let a1 = 2.0 * (w0 - k) / d;

    BiquadCoefficients {
        a1,
        a2: a1 * a1 / 4.0,
        b0,
        b1: 2.0 * b0,
        b2: b0,
    }
}

/// Second-order high-pass at `cutoff_hz`
///
/// Shares the low-pass denominator; only the sign of `b1` differs.
#[must_use]
pub fn design_high_pass(cutoff_hz: f64, sample_rate_hz: f64) -> BiquadCoefficients {
    let low = design_low_pass(cutoff_hz, sample_rate_hz);
    BiquadCoefficients {
        b1: -2.0 * low.b0,
        ..low
    }
}

/// Second-order band-pass centered on `center_hz` with quality `q`
#[must_use]
pub fn design_band_pass(center_hz: f64, q: f64, sample_rate_hz: f64) -> BiquadCoefficients {
    let (w0, k) = prewarp(center_hz, sample_rate_hz);
    let w0_sq = w0 * w0;
    let k_sq = k * k;
    let d = w0_sq * q + w0 * k + k_sq * q;
    let b0 = w0 * k / d;

    BiquadCoefficients {
        a1: 2.0 * q * (w0_sq - k_sq) / d,
        a2: (w0_sq * q - w0 * k + k_sq * q) / d,
        b0,
        b1: 0.0,
        b2: -b0,
    }
}
