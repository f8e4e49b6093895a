//! Frequency response of the equalizer
//!
//! Evaluates each biquad's transfer function on the unit circle and combines
//! the bands the same way the runtime mixes them:
//!
//! ```text
//! H_total(f) = (1 + A_low·H_low(f) + A_band·H_band(f) + A_high·H_high(f)) · B
//! ```

use crate::equalizer::EqGains;
use crate::filter::{BiquadCoefficients, FilterBank, FilterKind};
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// Lower clip for plotted magnitudes
pub const MIN_DB: f64 = -40.0;
/// Upper clip for plotted magnitudes
pub const MAX_DB: f64 = 40.0;

/// Transfer function of one biquad at `frequency_hz`
///
/// H(z) = (b0 + b1·z⁻¹ + b2·z⁻²) / (1 + a1·z⁻¹ + a2·z⁻²), z = e^(jω)
#[must_use]
pub fn biquad_response(
    coeffs: &BiquadCoefficients,
    frequency_hz: f64,
    sample_rate_hz: f64,
) -> Complex64 {
    let omega = 2.0 * PI * frequency_hz / sample_rate_hz;
    let z1 = Complex64::from_polar(1.0, -omega);
    let z2 = z1 * z1;

    let numerator = coeffs.b0 + z1 * coeffs.b1 + z2 * coeffs.b2;
    let denominator = 1.0 + z1 * coeffs.a1 + z2 * coeffs.a2;

    numerator / denominator
}

/// Combined equalizer transfer function at `frequency_hz`
#[must_use]
pub fn equalizer_response(
    bank: &FilterBank,
    gains: &EqGains,
    output_gain: f64,
    frequency_hz: f64,
    sample_rate_hz: f64,
) -> Complex64 {
    let mixed = FilterKind::ALL
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &kind| {
            acc + biquad_response(bank.get(kind), frequency_hz, sample_rate_hz) * gains.get(kind)
        });

    mixed * output_gain
}

/// 20·log10|h|, clipped to [`MIN_DB`, `MAX_DB`]
///
/// A zero magnitude maps to `MIN_DB`.
#[must_use]
pub fn magnitude_db(h: Complex64) -> f64 {
    let db = 20.0 * h.norm().log10();
    if db.is_nan() {
        return MIN_DB;
    }
    db.clamp(MIN_DB, MAX_DB)
}

/// `points` frequencies spaced logarithmically from `min_hz` to `max_hz` inclusive
///
/// One point yields `[min_hz]`; zero points yield an empty grid.
#[must_use]
pub fn log_frequency_grid(points: usize, min_hz: f64, max_hz: f64) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![min_hz],
        _ => {
            let log_min = min_hz.log10();
            let log_max = max_hz.log10();
            let last = (points - 1) as f64;

            (0..points)
                .map(|i| {
                    let t = i as f64 / last;
                    10f64.powf(log_min + t * (log_max - log_min))
                })
                .collect()
        }
    }
}

/// Clipped equalizer magnitude in dB at every frequency of `grid`
#[must_use]
pub fn equalizer_magnitude_db(
    bank: &FilterBank,
    gains: &EqGains,
    output_gain: f64,
    grid: &[f64],
    sample_rate_hz: f64,
) -> Vec<f64> {
    grid.iter()
        .map(|&f| magnitude_db(equalizer_response(bank, gains, output_gain, f, sample_rate_hz)))
        .collect()
}
