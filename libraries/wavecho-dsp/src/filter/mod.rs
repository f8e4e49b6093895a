//! Second-order IIR filters
//!
//! Coefficients come from a bilinear transform of the analog prototypes and
//! use the convention
//!
//! ```text
//! y[n] = b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]
//! ```
//!
//! Everything is kept in `f64` so the designed coefficients satisfy their
//! algebraic identities exactly and the runtime state never drifts.

mod design;
mod runtime;

pub use design::{design_band_pass, design_high_pass, design_low_pass};
pub use runtime::FilterState;

use crate::error::{DspError, Result};
use serde::{Deserialize, Serialize};

/// Biquad coefficients (a0 normalized to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiquadCoefficients {
    /// Feedback coefficient on y[n-1]
    pub a1: f64,
    /// Feedback coefficient on y[n-2]
    pub a2: f64,
    /// Feedforward coefficient on x[n]
    pub b0: f64,
    /// Feedforward coefficient on x[n-1]
    pub b1: f64,
    /// Feedforward coefficient on x[n-2]
    pub b2: f64,
}

impl BiquadCoefficients {
    /// All-zero coefficients; the filter outputs silence
    pub const ZERO: Self = Self {
        a1: 0.0,
        a2: 0.0,
        b0: 0.0,
        b1: 0.0,
        b2: 0.0,
    };

    /// Pass-through coefficients (b0 = 1, everything else 0)
    pub const IDENTITY: Self = Self {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    };
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::ZERO
    }
}

/// The three bands of the equalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Low-pass band
    Low,
    /// Band-pass band
    Band,
    /// High-pass band
    High,
}

impl FilterKind {
    /// All bands in processing order
    pub const ALL: [Self; 3] = [Self::Low, Self::Band, Self::High];

    /// Position of this band in per-channel state arrays
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::Band => 1,
            Self::High => 2,
        }
    }
}

/// Designed coefficients for all three bands
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterBank {
    /// Low-pass coefficients
    pub low: BiquadCoefficients,
    /// Band-pass coefficients
    pub band: BiquadCoefficients,
    /// High-pass coefficients
    pub high: BiquadCoefficients,
}

impl FilterBank {
    /// Coefficients of a single band
    pub fn get(&self, kind: FilterKind) -> &BiquadCoefficients {
        match kind {
            FilterKind::Low => &self.low,
            FilterKind::Band => &self.band,
            FilterKind::High => &self.high,
        }
    }

    /// Replace the coefficients of a single band
    pub fn set(&mut self, kind: FilterKind, coeffs: BiquadCoefficients) {
        match kind {
            FilterKind::Low => self.low = coeffs,
            FilterKind::Band => self.band = coeffs,
            FilterKind::High => self.high = coeffs,
        }
    }
}

/// User-facing filter parameters, designed into a [`FilterBank`] per sample rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Low-pass corner frequency in Hz
    pub low_cutoff_hz: f64,
    /// Band-pass center frequency in Hz
    pub band_center_hz: f64,
    /// Band-pass quality factor
    pub band_q: f64,
    /// High-pass corner frequency in Hz
    pub high_cutoff_hz: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            low_cutoff_hz: 300.0,
            band_center_hz: 1000.0,
            band_q: 1.0,
            high_cutoff_hz: 4000.0,
        }
    }
}

impl FilterSettings {
    /// Check every frequency lies in (0, fs/2) and Q is positive
    ///
    /// # Errors
    ///
    /// Returns the first parameter found out of range.
    pub fn validate(&self, sample_rate_hz: f64) -> Result<()> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(DspError::InvalidSampleRate(sample_rate_hz));
        }

        let nyquist_hz = sample_rate_hz / 2.0;
        for frequency_hz in [self.low_cutoff_hz, self.band_center_hz, self.high_cutoff_hz] {
            if !(frequency_hz > 0.0 && frequency_hz < nyquist_hz) {
                return Err(DspError::FrequencyOutOfRange {
                    frequency_hz,
                    nyquist_hz,
                });
            }
        }

        if !(self.band_q.is_finite() && self.band_q > 0.0) {
            return Err(DspError::InvalidQ(self.band_q));
        }

        Ok(())
    }

    /// Design all three bands for `sample_rate_hz`
    ///
    /// Parameters are not clamped; call [`validate`](Self::validate) first
    /// if they come from user input.
    #[must_use]
    pub fn design(&self, sample_rate_hz: f64) -> FilterBank {
        FilterBank {
            low: design_low_pass(self.low_cutoff_hz, sample_rate_hz),
            band: design_band_pass(self.band_center_hz, self.band_q, sample_rate_hz),
            high: design_high_pass(self.high_cutoff_hz, sample_rate_hz),
        }
    }
}
