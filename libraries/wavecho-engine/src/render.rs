//! Audio render worker
//!
//! ```text
//! INIT -> IDLE -> STREAMING -> IDLE
//!           \         \
//!            +---------+----> TERMINATED
//! ```
//!
//! The worker snapshots the control register once per loop iteration, and
//! once per frame while streaming, so parameter edits apply within one
//! block of latency. Each play request starts at most one playback: a
//! finished file is not replayed until the control context requests play
//! again, whether or not it cleared the play control in between.

use crate::config::EngineConfig;
use crate::control::{ControlSnapshot, SharedControlRegister};
use crate::termination::TerminationSignal;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use wavecho_core::{
    Result, SampleRate, SampleSink, Semaphore, SinkOpener, SourceOpener, StereoFrame,
    WavechoError,
};
use wavecho_dsp::{EchoEffect, ParametricEqualizer};

/// Render worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// Constructed, not yet running
    #[default]
    Init,
    /// Waiting for a play request
    Idle,
    /// Reading, processing, and writing frames
    Streaming,
    /// Exited after a shutdown request
    Terminated,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Progress published by the render worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStatus {
    pub state: RenderState,
    /// Frames handed to sinks since the worker started
    pub frames_rendered: u64,
    pub blocks_written: u64,
    /// Most recent failed playback attempt
    pub last_error: Option<String>,
}

/// Per-frame effect chain: echo, then equalizer
///
/// A disabled stage is skipped entirely; its state is left untouched.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    echo: EchoEffect,
    equalizer: ParametricEqualizer,
}

impl FrameProcessor {
    /// Create a chain whose echo delay line holds `echo_buffer_len` samples
    pub fn new(echo_buffer_len: usize) -> Self {
        Self {
            echo: EchoEffect::new(echo_buffer_len),
            equalizer: ParametricEqualizer::new(),
        }
    }

    /// Apply the enabled stages to one frame
    pub fn process(&mut self, frame: StereoFrame, snapshot: &ControlSnapshot) -> StereoFrame {
        let mut out = frame;
        if snapshot.echo_enabled {
            out = self.echo.process(out, &snapshot.echo_params);
        }
        if snapshot.eq_enabled {
            out = self.equalizer.process_frame(
                out,
                &snapshot.filter_bank,
                &snapshot.eq_gains,
                snapshot.eq_output_gain,
            );
        }
        out
    }
}

/// Why a streaming session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    EndOfInput,
    Stopped,
    Shutdown,
}

/// Streams frames from a source through the effect chain into a sink
pub struct AudioRenderWorker {
    register: Arc<SharedControlRegister>,
    sources: Box<dyn SourceOpener>,
    sinks: Box<dyn SinkOpener>,
    status: Arc<Mutex<RenderStatus>>,
    terminated: Arc<Semaphore>,
    processor: FrameProcessor,
    sample_rate: SampleRate,
    block_frames: usize,
    idle_poll: Duration,
    /// Last play request this worker acted on
    served_generation: u64,
}

impl AudioRenderWorker {
    pub fn new(
        register: Arc<SharedControlRegister>,
        sources: Box<dyn SourceOpener>,
        sinks: Box<dyn SinkOpener>,
        terminated: Arc<Semaphore>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            register,
            sources,
            sinks,
            status: Arc::new(Mutex::new(RenderStatus::default())),
            terminated,
            processor: FrameProcessor::new(config.sample_rate_hz as usize),
            sample_rate: config.sample_rate(),
            block_frames: config.block_frames.max(1),
            idle_poll: config.idle_poll(),
            served_generation: 0,
        }
    }

    /// Shared handle to the published status
    pub fn status_handle(&self) -> Arc<Mutex<RenderStatus>> {
        Arc::clone(&self.status)
    }

    /// Run until shutdown is requested, then signal the termination semaphore
    pub fn run(mut self) {
        let _signal = TerminationSignal::new(&self.terminated);
        self.set_state(RenderState::Idle);
        info!("render worker idle");

        loop {
            let snapshot = self.register.read_snapshot();
            if snapshot.shutdown_requested {
                break;
            }

            if !snapshot.play_requested || snapshot.play_generation == self.served_generation {
                thread::sleep(self.idle_poll);
                continue;
            }
            self.served_generation = snapshot.play_generation;

            let Some(path) = snapshot.input_path else {
                warn!("play requested with no input file");
                self.record_error("no input file selected");
                continue;
            };

            match self.stream(&path) {
                Ok(StreamEnd::Shutdown) => break,
                Ok(StreamEnd::EndOfInput) => info!(path = %path.display(), "end of input"),
                Ok(StreamEnd::Stopped) => info!(path = %path.display(), "playback stopped"),
                Err(e) if e.is_unblocked() => {
                    debug!("output released for shutdown");
                    break;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "playback failed");
                    self.record_error(&e.to_string());
                }
            }
            self.set_state(RenderState::Idle);
        }

        self.set_state(RenderState::Terminated);
        info!("render worker terminated");
    }

    fn stream(&mut self, path: &Path) -> Result<StreamEnd> {
        let mut source = self.sources.open(path)?;
        let format = source.format();
        if !format.is_stereo_16() {
            return Err(WavechoError::unsupported_format(format!(
                "{} channel(s) at {} bits, need 2 channels at 16 bits",
                format.channels, format.bits_per_sample
            )));
        }
        if format.sample_rate != self.sample_rate {
            warn!(
                file_hz = format.sample_rate.as_hz(),
                design_hz = self.sample_rate.as_hz(),
                "sample rate differs from the filter design rate"
            );
        }

        let mut sink = self.sinks.open(&format)?;
        self.set_state(RenderState::Streaming);
        info!(path = %path.display(), rate = format.sample_rate.as_hz(), "streaming");

        let mut block = Vec::with_capacity(self.block_frames);
        let end = loop {
            let snapshot = self.register.read_snapshot();
            if snapshot.shutdown_requested {
                break StreamEnd::Shutdown;
            }
            if !snapshot.play_requested {
                break StreamEnd::Stopped;
            }
            // play pressed again mid-stream does not queue a replay
            self.served_generation = snapshot.play_generation;

            let Some(frame) = source.read_frame()? else {
                break StreamEnd::EndOfInput;
            };
            block.push(self.processor.process(frame, &snapshot));

            if block.len() == self.block_frames {
                self.write_block(sink.as_mut(), &mut block)?;
            }
        };

        if end == StreamEnd::EndOfInput && !block.is_empty() {
            self.write_block(sink.as_mut(), &mut block)?;
        }
        sink.finish()?;

        Ok(end)
    }

    fn write_block(&self, sink: &mut dyn SampleSink, block: &mut Vec<StereoFrame>) -> Result<()> {
        sink.write_block(block)?;

        let mut status = self.lock_status();
        status.frames_rendered += block.len() as u64;
        status.blocks_written += 1;
        trace!(frames = block.len(), blocks = status.blocks_written, "block written");
        drop(status);

        block.clear();
        Ok(())
    }

    fn set_state(&self, state: RenderState) {
        self.lock_status().state = state;
    }

    fn record_error(&self, message: &str) {
        self.lock_status().last_error = Some(message.to_string());
    }

    fn lock_status(&self) -> MutexGuard<'_, RenderStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavecho_dsp::{EchoParams, EqGains, FilterSettings};

    fn snapshot() -> ControlSnapshot {
        ControlSnapshot::initial(FilterSettings::default().design(44_100.0))
    }

    #[test]
    fn disabled_stages_pass_impulse_unchanged() {
        let mut processor = FrameProcessor::new(44_100);
        let mut snap = snapshot();
        // parameters set but both stages disabled
        snap.echo_params = EchoParams {
            delay_samples: 2,
            gain: 1.0,
            feedback: 0.5,
        };
        snap.eq_gains = EqGains {
            low: 5.0,
            band: 5.0,
            high: 5.0,
        };

        let mut input = vec![StereoFrame::SILENCE; 32];
        input[0] = StereoFrame::new(i16::MAX, i16::MIN);

        for frame in input {
            assert_eq!(processor.process(frame, &snap), frame);
        }
    }

    #[test]
    fn echo_runs_before_equalizer() {
        let mut snap = snapshot();
        snap.echo_enabled = true;
        snap.eq_enabled = true;
        snap.echo_params = EchoParams {
            delay_samples: 0,
            gain: 0.5,
            feedback: 0.0,
        };
        snap.eq_output_gain = 0.5;

        // echo: 100 + (100 + 100) * 0.5 = 200, then EQ with zero gains halves it
        let mut processor = FrameProcessor::new(16);
        let out = processor.process(StereoFrame::new(100, 100), &snap);
        assert_eq!(out, StereoFrame::new(100, 100));
    }

    #[test]
    fn state_names() {
        assert_eq!(RenderState::default(), RenderState::Init);
        assert_eq!(RenderState::Streaming.to_string(), "streaming");
    }
}
