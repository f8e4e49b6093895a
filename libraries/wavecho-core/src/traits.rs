/// Core traits for Wavecho
///
/// The render worker never touches files or devices directly. It opens
/// sources and sinks through these traits so that WAV files, audio devices,
/// and in-memory test doubles are interchangeable.
use crate::error::Result;
use crate::sync::BoundedBlockingQueue;
use crate::types::{AudioFormat, StereoFrame};
use std::path::Path;
use std::sync::Arc;

/// Stream of stereo frames with a discoverable format
///
/// Implementers are expected to report the format from the container header
/// even when it is not 16-bit stereo; rejecting unsupported layouts is the
/// consumer's job.
pub trait SampleSource: Send {
    /// Format announced by the source
    fn format(&self) -> AudioFormat;

    /// Read the next stereo frame
    ///
    /// # Returns
    /// * `Ok(Some(frame))` - Next frame
    /// * `Ok(None)` - End of stream
    /// * `Err(_)` - Read failure
    fn read_frame(&mut self) -> Result<Option<StereoFrame>>;
}

/// Blocking consumer of fixed-size frame blocks
pub trait SampleSink: Send {
    /// Write one block of interleaved frames, blocking until accepted
    ///
    /// Returns `WavechoError::Unblocked` if the sink was released for
    /// termination while waiting.
    fn write_block(&mut self, block: &[StereoFrame]) -> Result<()>;

    /// Flush buffered data and release the sink
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Opens input sources by path
pub trait SourceOpener: Send {
    /// Open the source at `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its header is unreadable
    fn open(&mut self, path: &Path) -> Result<Box<dyn SampleSource>>;
}

/// Opens output sinks for a given stream format
pub trait SinkOpener: Send {
    /// Open a sink that accepts frames in `format`
    ///
    /// # Errors
    /// Returns `WavechoError::Device` if the output is unavailable
    fn open(&mut self, format: &AudioFormat) -> Result<Box<dyn SampleSink>>;

    /// Queue that opened sinks block on, if any
    ///
    /// Whoever owns the render thread releases this queue on shutdown so a
    /// worker parked inside `write_block` can return.
    fn blocking_queue(&self) -> Option<Arc<BoundedBlockingQueue>> {
        None
    }
}
