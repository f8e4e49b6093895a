//! Common test doubles and helpers for engine tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use wavecho_core::{
    AudioFormat, Result, SampleSink, SampleSource, SinkOpener, SourceOpener, StereoFrame,
    WavechoError,
};
use wavecho_engine::EngineConfig;

/// Upper bound for any condition a test waits on
pub const WAIT_LIMIT: Duration = Duration::from_secs(10);

/// Poll `condition` until it holds; panic after [`WAIT_LIMIT`]
pub fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT_LIMIT;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Small blocks and fast polling so tests run quickly
pub fn test_config(block_frames: usize) -> EngineConfig {
    EngineConfig {
        block_frames,
        idle_poll_ms: 1,
        sampler_period_ms: 10,
        ..EngineConfig::default()
    }
}

pub fn impulse(len: usize, value: i16) -> Vec<StereoFrame> {
    let mut frames = vec![StereoFrame::SILENCE; len];
    frames[0] = StereoFrame::new(value, value);
    frames
}

pub fn ramp(len: usize) -> Vec<StereoFrame> {
    (0..len)
        .map(|i| {
            let v = (i % 2000) as i16 - 1000;
            StereoFrame::new(v, -v)
        })
        .collect()
}

// ============================================================================
// SOURCES
// ============================================================================

/// Serves the same in-memory frames on every open
#[derive(Clone)]
pub struct MemorySourceOpener {
    pub format: AudioFormat,
    pub frames: Arc<Vec<StereoFrame>>,
    pub opens: Arc<AtomicUsize>,
}

impl MemorySourceOpener {
    pub fn new(frames: Vec<StereoFrame>) -> Self {
        Self::with_format(frames, AudioFormat::cd_quality())
    }

    pub fn with_format(frames: Vec<StereoFrame>, format: AudioFormat) -> Self {
        Self {
            format,
            frames: Arc::new(frames),
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

struct MemorySource {
    format: AudioFormat,
    frames: Arc<Vec<StereoFrame>>,
    position: usize,
}

impl SampleSource for MemorySource {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn read_frame(&mut self) -> Result<Option<StereoFrame>> {
        let frame = self.frames.get(self.position).copied();
        self.position += 1;
        Ok(frame)
    }
}

impl SourceOpener for MemorySourceOpener {
    fn open(&mut self, _path: &Path) -> Result<Box<dyn SampleSource>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySource {
            format: self.format,
            frames: Arc::clone(&self.frames),
            position: 0,
        }))
    }
}

/// Never reaches end of stream
#[derive(Clone, Default)]
pub struct EndlessSourceOpener;

struct EndlessSource {
    counter: i16,
}

impl SampleSource for EndlessSource {
    fn format(&self) -> AudioFormat {
        AudioFormat::cd_quality()
    }

    fn read_frame(&mut self) -> Result<Option<StereoFrame>> {
        self.counter = self.counter.wrapping_add(1);
        Ok(Some(StereoFrame::new(self.counter, self.counter)))
    }
}

impl SourceOpener for EndlessSourceOpener {
    fn open(&mut self, _path: &Path) -> Result<Box<dyn SampleSource>> {
        Ok(Box::new(EndlessSource { counter: 0 }))
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Records every block written by every sink it opens
#[derive(Clone, Default)]
pub struct CollectingSinkOpener {
    pub blocks: Arc<Mutex<Vec<Vec<StereoFrame>>>>,
    pub opens: Arc<AtomicUsize>,
    pub finishes: Arc<AtomicUsize>,
}

impl CollectingSinkOpener {
    pub fn block_sizes(&self) -> Vec<usize> {
        self.blocks.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub fn frames(&self) -> Vec<StereoFrame> {
        self.blocks.lock().unwrap().concat()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn finishes(&self) -> usize {
        self.finishes.load(Ordering::SeqCst)
    }
}

struct CollectingSink {
    blocks: Arc<Mutex<Vec<Vec<StereoFrame>>>>,
    finishes: Arc<AtomicUsize>,
}

impl SampleSink for CollectingSink {
    fn write_block(&mut self, block: &[StereoFrame]) -> Result<()> {
        self.blocks.lock().unwrap().push(block.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finishes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl SinkOpener for CollectingSinkOpener {
    fn open(&mut self, _format: &AudioFormat) -> Result<Box<dyn SampleSink>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CollectingSink {
            blocks: Arc::clone(&self.blocks),
            finishes: Arc::clone(&self.finishes),
        }))
    }
}

/// Output device that is never available
#[derive(Clone, Default)]
pub struct UnavailableSinkOpener {
    pub attempts: Arc<AtomicUsize>,
}

impl SinkOpener for UnavailableSinkOpener {
    fn open(&mut self, _format: &AudioFormat) -> Result<Box<dyn SampleSink>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(WavechoError::device("no output device"))
    }
}
