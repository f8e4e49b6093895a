//! Wavecho Engine
//!
//! Concurrent render engine built on `wavecho-core` and `wavecho-dsp`.
//!
//! Three execution contexts share state:
//! - The control context (any thread holding the [`Engine`]) edits the
//!   [`SharedControlRegister`]
//! - The [`AudioRenderWorker`] streams a source through echo and equalizer
//!   into an output sink
//! - The [`FrequencyResponseSampler`] republishes the equalizer response into
//!   the [`PlotBuffer`] twice a second
//!
//! The register and the plot buffer each sit behind their own mutex and no
//! code path holds both at once. Shutdown is cooperative: workers poll the
//! shutdown flag, and the output queue is released so a worker parked on a
//! full queue can return.
//!
//! # Example
//!
//! ```rust,no_run
//! use wavecho_engine::{CpalSinkOpener, Engine, EngineConfig, WavSourceOpener};
//! use wavecho_dsp::EchoParams;
//!
//! let config = EngineConfig::load(None)?;
//! let sinks = CpalSinkOpener::new(config.output_queue_slots())?;
//! let mut engine = Engine::start(config, WavSourceOpener::new(), sinks)?;
//!
//! let control = engine.register();
//! control.set_input_path("song.wav");
//! control.set_echo_params(EchoParams { delay_samples: 11_025, gain: 0.4, feedback: 0.3 })?;
//! control.set_echo_enabled(true);
//! control.set_play(true);
//!
//! engine.shutdown()?;
//! # Ok::<(), wavecho_engine::EngineError>(())
//! ```

pub mod config;
pub mod control;
mod engine;
mod error;
pub mod output;
pub mod plot;
pub mod render;
pub mod sampler;
pub mod sources;
mod termination;

pub use config::EngineConfig;
pub use control::{ControlSnapshot, SharedControlRegister};
pub use engine::Engine;
pub use error::{EngineError, Result};
#[cfg(feature = "cpal-output")]
pub use output::CpalSinkOpener;
pub use output::{QueueSink, QueueSinkOpener, WavFileSink, WavFileSinkOpener};
pub use plot::{PlotBuffer, PlotPoint};
pub use render::{AudioRenderWorker, FrameProcessor, RenderState, RenderStatus};
pub use sampler::FrequencyResponseSampler;
pub use sources::{WavSource, WavSourceOpener};
