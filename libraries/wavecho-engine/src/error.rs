/// Engine error types
use thiserror::Error;
use wavecho_core::WavechoError;
use wavecho_dsp::DspError;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error from a core primitive, source, or sink
    #[error(transparent)]
    Core(#[from] WavechoError),

    /// Filter parameters out of range
    #[error(transparent)]
    Filter(#[from] DspError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// A control value outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A worker thread could not be spawned
    #[error("Failed to spawn {name} thread: {source}")]
    Thread {
        /// Thread name
        name: &'static str,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked before it could be joined
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
}

impl EngineError {
    /// True if this error means a queue was released for shutdown
    pub fn is_unblocked(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_unblocked())
    }
}
