/// WAV file output via hound
use crate::sources::wav_error;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use wavecho_core::{AudioFormat, Result, SampleSink, SinkOpener, StereoFrame, WavechoError};

/// Opens a 16-bit stereo WAV writer at a fixed path for every playback
///
/// Each play request overwrites the file.
#[derive(Debug, Clone)]
pub struct WavFileSinkOpener {
    path: PathBuf,
}

impl WavFileSinkOpener {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SinkOpener for WavFileSinkOpener {
    fn open(&mut self, format: &AudioFormat) -> Result<Box<dyn SampleSink>> {
        Ok(Box::new(WavFileSink::create(&self.path, format)?))
    }
}

/// Streams frames into a WAV file; finalized by [`SampleSink::finish`] or on drop
pub struct WavFileSink {
    writer: Option<WavWriter<BufWriter<File>>>,
}

impl WavFileSink {
    /// Create (or truncate) `path` for `format`'s sample rate
    pub fn create(path: &Path, format: &AudioFormat) -> Result<Self> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: format.sample_rate.as_hz(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec).map_err(|e| {
            WavechoError::device(format!("cannot create {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), rate = spec.sample_rate, "wav output opened");

        Ok(Self {
            writer: Some(writer),
        })
    }
}

impl SampleSink for WavFileSink {
    fn write_block(&mut self, block: &[StereoFrame]) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| WavechoError::device("wav output already finalized"))?;

        for frame in block {
            writer.write_sample(frame.left).map_err(wav_error)?;
            writer.write_sample(frame.right).map_err(wav_error)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(writer) => writer.finalize().map_err(wav_error),
            None => Ok(()),
        }
    }
}

impl Drop for WavFileSink {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!(error = %e, "failed to finalize wav output");
        }
    }
}
