use std::sync::Arc;
use wavecho_core::Semaphore;

/// Signals the termination semaphore when a worker leaves `run`, even by panic
pub(crate) struct TerminationSignal(Arc<Semaphore>);

impl TerminationSignal {
    pub(crate) fn new(semaphore: &Arc<Semaphore>) -> Self {
        Self(Arc::clone(semaphore))
    }
}

impl Drop for TerminationSignal {
    fn drop(&mut self) {
        self.0.signal();
    }
}
