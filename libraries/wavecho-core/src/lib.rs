//! Wavecho Core
//!
//! Platform-agnostic core types, traits, and synchronization primitives for Wavecho.
//!
//! This crate provides the foundational building blocks shared by the DSP and
//! engine crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Audio Types**: `StereoFrame`, `AudioFormat`, `SampleRate`
//! - **Core Traits**: `SampleSource`, `SampleSink` and their openers
//! - **Synchronization**: counting `Semaphore` and `BoundedBlockingQueue`
//! - **Error Handling**: Unified `WavechoError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use wavecho_core::sync::BoundedBlockingQueue;
//!
//! // Four slots of four bytes each
//! let queue = BoundedBlockingQueue::new(4, 4).unwrap();
//! queue.write(1, &[1, 2, 3, 4]).unwrap();
//!
//! let mut out = [0u8; 4];
//! queue.read(1, &mut out).unwrap();
//! assert_eq!(out, [1, 2, 3, 4]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WavechoError};
pub use sync::{BoundedBlockingQueue, Semaphore};
pub use traits::{SampleSink, SampleSource, SinkOpener, SourceOpener};
pub use types::{AudioFormat, SampleRate, StereoFrame};
