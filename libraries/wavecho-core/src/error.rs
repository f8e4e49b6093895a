/// Core error types for Wavecho
use thiserror::Error;

/// Result type alias using `WavechoError`
pub type Result<T> = std::result::Result<T, WavechoError>;

/// Core error type for Wavecho
#[derive(Error, Debug)]
pub enum WavechoError {
    /// Queue could not be created with the requested geometry
    #[error("Invalid queue geometry: slot size {slot_size}, slot count {slot_count}")]
    InvalidQueueGeometry {
        /// Requested slot size in bytes
        slot_size: usize,
        /// Requested number of slots
        slot_count: usize,
    },

    /// Caller buffer cannot hold the requested number of slots
    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall {
        /// Bytes required for the transfer
        needed: usize,
        /// Bytes provided by the caller
        actual: usize,
    },

    /// The primitive was unblocked for termination; no data was transferred
    #[error("Unblocked for termination")]
    Unblocked,

    /// Input stream is not 16-bit two-channel PCM
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Output device could not be opened or failed
    #[error("Device error: {0}")]
    Device(String),

    /// Input source failed while reading
    #[error("Source error: {0}")]
    Source(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WavechoError {
    /// Create an unsupported format error
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create a source error
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// True when the error only signals termination, not a failure
    pub fn is_unblocked(&self) -> bool {
        matches!(self, Self::Unblocked)
    }
}
