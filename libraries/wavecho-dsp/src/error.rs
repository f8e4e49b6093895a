//! DSP parameter errors
use thiserror::Error;

/// Result type alias using `DspError`
pub type Result<T> = std::result::Result<T, DspError>;

/// DSP error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    /// Corner or center frequency outside (0, fs/2)
    #[error("Frequency {frequency_hz} Hz outside (0, {nyquist_hz}) Hz")]
    FrequencyOutOfRange {
        /// Requested frequency
        frequency_hz: f64,
        /// Nyquist frequency of the design rate
        nyquist_hz: f64,
    },

    /// Band-pass quality factor must be positive
    #[error("Invalid Q: {0}. Must be greater than 0")]
    InvalidQ(f64),

    /// Sample rate must be positive
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),
}
