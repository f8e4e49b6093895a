use super::semaphore::Semaphore;
use crate::error::{Result, WavechoError};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mutable queue state, guarded by the critical-section mutex
#[derive(Debug)]
struct QueueState {
    buffer: Vec<u8>,
    read_index: usize,
    write_index: usize,
    used_slots: usize,
    unblocked_for_termination: bool,
}

/// Fixed-capacity FIFO of equally sized byte slots
///
/// Writers block while every slot is full, readers block while every slot is
/// empty. Multi-slot transfers proceed one slot at a time, so concurrent
/// writers may interleave at slot granularity but each writer's slots stay in
/// order.
///
/// Three primitives coordinate access:
/// - `empty_slots` counts free slots (writers wait on it)
/// - `filled_slots` counts used slots (readers wait on it)
/// - `state` is the critical section around indices and the byte buffer
///
/// After [`unblock_for_termination`](Self::unblock_for_termination) the queue
/// never transports data again and never blocks: every read or write returns
/// [`WavechoError::Unblocked`].
#[derive(Debug)]
pub struct BoundedBlockingQueue {
    slot_size: usize,
    slot_count: usize,
    empty_slots: Semaphore,
    filled_slots: Semaphore,
    state: Mutex<QueueState>,
}

impl BoundedBlockingQueue {
    /// Create a queue of `slot_count` slots, each `slot_size` bytes wide
    ///
    /// # Errors
    /// Returns `InvalidQueueGeometry` if either dimension is zero or the
    /// byte capacity overflows `usize`.
    pub fn new(slot_size: usize, slot_count: usize) -> Result<Self> {
        let byte_capacity = slot_size
            .checked_mul(slot_count)
            .filter(|&bytes| bytes > 0)
            .ok_or(WavechoError::InvalidQueueGeometry {
                slot_size,
                slot_count,
            })?;

        Ok(Self {
            slot_size,
            slot_count,
            empty_slots: Semaphore::new(slot_count),
            filled_slots: Semaphore::new(0),
            state: Mutex::new(QueueState {
                buffer: vec![0; byte_capacity],
                read_index: 0,
                write_index: 0,
                used_slots: 0,
                unblocked_for_termination: false,
            }),
        })
    }

    /// Copy `n_slots` slots from `data` into the queue
    ///
    /// Blocks once per slot while the queue is full. Returns after all slots
    /// are written, or with `Unblocked` as soon as the queue is released for
    /// termination (slots written before that point stay in the queue).
    pub fn write(&self, n_slots: usize, data: &[u8]) -> Result<()> {
        let needed = self.transfer_len(n_slots, data.len())?;
        for slot in data[..needed].chunks_exact(self.slot_size) {
            self.write_slot(slot)?;
        }
        Ok(())
    }

    /// Copy `n_slots` slots out of the queue into `data`
    ///
    /// Mirror of [`write`](Self::write): blocks once per slot while the queue
    /// is empty.
    pub fn read(&self, n_slots: usize, data: &mut [u8]) -> Result<()> {
        let needed = self.transfer_len(n_slots, data.len())?;
        for slot in data[..needed].chunks_exact_mut(self.slot_size) {
            self.filled_slots.wait();
            self.read_slot(slot)?;
        }
        Ok(())
    }

    /// Read up to `max_slots` slots without blocking
    ///
    /// Returns the number of slots copied into `data`; stops at the first slot
    /// that is not yet available. Real-time consumers (device callbacks) use
    /// this instead of [`read`](Self::read).
    pub fn try_read(&self, max_slots: usize, data: &mut [u8]) -> Result<usize> {
        let needed = self.transfer_len(max_slots, data.len())?;
        let mut copied = 0;
        for slot in data[..needed].chunks_exact_mut(self.slot_size) {
            if !self.filled_slots.try_wait() {
                break;
            }
            self.read_slot(slot)?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Release every thread parked on this queue and stop transporting data
    ///
    /// Wakes one pending writer and one pending reader. Each woken operation
    /// passes the wake-up on before returning `Unblocked`, so any number of
    /// parked threads drain out and later calls never block.
    pub fn unblock_for_termination(&self) {
        self.lock_state().unblocked_for_termination = true;
        self.filled_slots.signal();
        self.empty_slots.signal();
    }

    /// True once [`unblock_for_termination`](Self::unblock_for_termination) ran
    pub fn is_unblocked(&self) -> bool {
        self.lock_state().unblocked_for_termination
    }

    /// True when no slot holds data
    pub fn is_empty(&self) -> bool {
        self.lock_state().used_slots == 0
    }

    /// True when every slot holds data
    pub fn is_full(&self) -> bool {
        self.lock_state().used_slots == self.slot_count
    }

    /// Number of slots currently holding data
    pub fn used_slots(&self) -> usize {
        self.lock_state().used_slots
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slot_count
    }

    /// Number of slots the queue was created with
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Size of one slot in bytes
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    fn write_slot(&self, slot: &[u8]) -> Result<()> {
        // thread blocks until at least one slot is free
        self.empty_slots.wait();

        let mut state = self.lock_state();
        if state.unblocked_for_termination {
            drop(state);
            // pass the wake-up on to the next parked writer
            self.empty_slots.signal();
            return Err(WavechoError::Unblocked);
        }

        let start = state.write_index;
        state.buffer[start..start + self.slot_size].copy_from_slice(slot);
        state.write_index = (start + self.slot_size) % state.buffer.len();
        state.used_slots += 1;
        drop(state);

        self.filled_slots.signal();
        Ok(())
    }

    /// Copy one slot out; the caller already holds a `filled_slots` permit
    fn read_slot(&self, slot: &mut [u8]) -> Result<()> {
        let mut state = self.lock_state();
        if state.unblocked_for_termination {
            drop(state);
            self.filled_slots.signal();
            return Err(WavechoError::Unblocked);
        }

        let start = state.read_index;
        slot.copy_from_slice(&state.buffer[start..start + self.slot_size]);
        state.read_index = (start + self.slot_size) % state.buffer.len();
        state.used_slots -= 1;
        drop(state);

        self.empty_slots.signal();
        Ok(())
    }

    /// Byte length of an `n_slots` transfer; fails once the queue is released
    fn transfer_len(&self, n_slots: usize, available: usize) -> Result<usize> {
        if self.is_unblocked() {
            return Err(WavechoError::Unblocked);
        }
        let needed = n_slots.saturating_mul(self.slot_size);
        if available < needed {
            return Err(WavechoError::BufferTooSmall {
                needed,
                actual: available,
            });
        }
        Ok(needed)
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_geometry() {
        assert!(matches!(
            BoundedBlockingQueue::new(0, 4),
            Err(WavechoError::InvalidQueueGeometry { .. })
        ));
        assert!(matches!(
            BoundedBlockingQueue::new(4, 0),
            Err(WavechoError::InvalidQueueGeometry { .. })
        ));
        assert!(BoundedBlockingQueue::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn empty_and_full_queries() {
        let queue = BoundedBlockingQueue::new(2, 2).unwrap();
        assert!(queue.is_empty());
        assert!(!queue.is_full());

        queue.write(2, &[1, 2, 3, 4]).unwrap();
        assert!(queue.is_full());
        assert_eq!(queue.used_slots(), 2);
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.slot_size(), 2);
    }

    #[test]
    fn indices_wrap_around() {
        let queue = BoundedBlockingQueue::new(1, 3).unwrap();
        let mut out = [0u8; 2];

        for round in 0..10u8 {
            queue.write(2, &[round, round.wrapping_add(100)]).unwrap();
            queue.read(2, &mut out).unwrap();
            assert_eq!(out, [round, round.wrapping_add(100)]);
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn short_buffer_is_rejected_without_transfer() {
        let queue = BoundedBlockingQueue::new(4, 2).unwrap();
        let err = queue.write(2, &[0; 7]).unwrap_err();
        assert!(matches!(err, WavechoError::BufferTooSmall { needed: 8, actual: 7 }));
        assert!(queue.is_empty());
    }

    #[test]
    fn try_read_stops_at_available_slots() {
        let queue = BoundedBlockingQueue::new(1, 4).unwrap();
        queue.write(2, &[7, 8]).unwrap();

        let mut out = [0u8; 4];
        assert_eq!(queue.try_read(4, &mut out).unwrap(), 2);
        assert_eq!(&out[..2], &[7, 8]);
        assert_eq!(queue.try_read(4, &mut out).unwrap(), 0);
    }

    #[test]
    fn operations_fail_after_unblock() {
        let queue = BoundedBlockingQueue::new(1, 1).unwrap();
        queue.unblock_for_termination();

        let mut out = [0u8; 1];
        assert!(queue.read(1, &mut out).unwrap_err().is_unblocked());
        assert!(queue.write(1, &[1]).unwrap_err().is_unblocked());
        // repeated calls still do not block
        assert!(queue.read(1, &mut out).unwrap_err().is_unblocked());
        assert!(queue.write(1, &[1]).unwrap_err().is_unblocked());
        assert!(queue.is_unblocked());
    }

    #[test]
    fn empty_transfers_fail_after_unblock() {
        let queue = BoundedBlockingQueue::new(1, 1).unwrap();
        assert!(queue.write(0, &[]).is_ok());
        queue.unblock_for_termination();

        let mut out = [0u8; 0];
        assert!(queue.write(0, &[]).unwrap_err().is_unblocked());
        assert!(queue.read(0, &mut out).unwrap_err().is_unblocked());
        assert!(queue.try_read(0, &mut out).unwrap_err().is_unblocked());
    }
}
