/// WAV file input via hound
use super::wav_error;
use hound::{SampleFormat, WavReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;
use wavecho_core::{
    AudioFormat, Result, SampleRate, SampleSource, SourceOpener, StereoFrame,
};

/// Opens WAV files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct WavSourceOpener;

impl WavSourceOpener {
    pub fn new() -> Self {
        Self
    }
}

impl SourceOpener for WavSourceOpener {
    fn open(&mut self, path: &Path) -> Result<Box<dyn SampleSource>> {
        Ok(Box::new(WavSource::open(path)?))
    }
}

/// Frame-by-frame reader over a WAV file
///
/// The format is reported exactly as the header states it. Floating-point
/// files are reported with their sample width so the consumer rejects them.
pub struct WavSource {
    reader: WavReader<BufReader<File>>,
    format: AudioFormat,
}

impl WavSource {
    /// Open `path` and parse its header
    pub fn open(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path).map_err(wav_error)?;
        let spec = reader.spec();
        let format = AudioFormat::new(
            SampleRate::new(spec.sample_rate),
            spec.channels,
            match spec.sample_format {
                SampleFormat::Int => spec.bits_per_sample,
                // never mistaken for 16-bit integer PCM
                SampleFormat::Float => spec.bits_per_sample.max(32),
            },
        );
        debug!(path = %path.display(), ?format, frames = reader.duration(), "opened wav");

        Ok(Self { reader, format })
    }

    /// Frames remaining according to the header
    pub fn frames_remaining(&self) -> u32 {
        self.reader.len() / u32::from(self.format.channels.max(1))
    }
}

impl SampleSource for WavSource {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn read_frame(&mut self) -> Result<Option<StereoFrame>> {
        let mut samples = self.reader.samples::<i16>();

        let Some(left) = samples.next() else {
            return Ok(None);
        };
        // a dangling half frame at the end counts as end of data
        let Some(right) = samples.next() else {
            return Ok(None);
        };

        Ok(Some(StereoFrame::new(
            left.map_err(wav_error)?,
            right.map_err(wav_error)?,
        )))
    }
}
