//! Output sinks
//!
//! - [`QueueSink`] feeds a [`BoundedBlockingQueue`](wavecho_core::BoundedBlockingQueue)
//!   drained by the audio device callback
//! - [`WavFileSink`] renders to a 16-bit stereo WAV file
//! - [`CpalSinkOpener`] plays through the default output device

#[cfg(feature = "cpal-output")]
mod device;
mod queue_sink;
mod wav_writer;

#[cfg(feature = "cpal-output")]
pub use device::CpalSinkOpener;
pub use queue_sink::{QueueSink, QueueSinkOpener};
pub use wav_writer::{WavFileSink, WavFileSinkOpener};
