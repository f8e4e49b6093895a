//! Blocking synchronization primitives
//!
//! A counting [`Semaphore`] and a fixed-capacity [`BoundedBlockingQueue`] built
//! on it. Both are portable (`Mutex` + `Condvar`) and support cooperative
//! shutdown: a thread parked on the queue can be released with
//! [`BoundedBlockingQueue::unblock_for_termination`] instead of being left
//! hanging.

mod queue;
mod semaphore;

pub use queue::BoundedBlockingQueue;
pub use semaphore::Semaphore;
