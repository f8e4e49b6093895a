//! Input sources

mod wav;

pub use wav::{WavSource, WavSourceOpener};

use wavecho_core::WavechoError;

/// Map a WAV codec error, keeping I/O failures distinguishable
pub(crate) fn wav_error(err: hound::Error) -> WavechoError {
    match err {
        hound::Error::IoError(e) => WavechoError::Io(e),
        other => WavechoError::source(other.to_string()),
    }
}
