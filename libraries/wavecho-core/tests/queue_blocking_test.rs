//! Blocking behaviour of the bounded queue
//!
//! Verifies that writers park exactly when the queue is full, readers park
//! exactly when it is empty, and that termination releases parked threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use wavecho_core::{BoundedBlockingQueue, WavechoError};

/// Time given to a spawned thread to reach its blocking point
const SETTLE: Duration = Duration::from_millis(100);

#[test]
fn writing_capacity_slots_never_blocks() {
    let queue = BoundedBlockingQueue::new(4, 8).unwrap();
    let data: Vec<u8> = (0..32).collect();

    // single-threaded: would deadlock if any slot blocked
    queue.write(8, &data).unwrap();

    assert!(queue.is_full());
    assert_eq!(queue.used_slots(), 8);
}

#[test]
fn writer_blocks_on_full_queue_until_one_read() {
    let queue = Arc::new(BoundedBlockingQueue::new(1, 3).unwrap());
    queue.write(3, &[1, 2, 3]).unwrap();

    let finished = Arc::new(AtomicBool::new(false));
    let writer = {
        let queue = Arc::clone(&queue);
        let finished = Arc::clone(&finished);
        thread::spawn(move || {
            queue.write(1, &[4]).unwrap();
            finished.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(SETTLE);
    assert!(!finished.load(Ordering::SeqCst), "write on full queue did not block");
    assert_eq!(queue.used_slots(), 3);

    let mut out = [0u8; 1];
    queue.read(1, &mut out).unwrap();
    assert_eq!(out, [1]);

    writer.join().unwrap();
    assert!(finished.load(Ordering::SeqCst));
    assert!(queue.is_full());

    let mut rest = [0u8; 3];
    queue.read(3, &mut rest).unwrap();
    assert_eq!(rest, [2, 3, 4]);
}

#[test]
fn reader_blocks_on_empty_queue_until_write() {
    let queue = Arc::new(BoundedBlockingQueue::new(2, 2).unwrap());

    let reader = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut out = [0u8; 2];
            queue.read(1, &mut out).map(|()| out)
        })
    };

    thread::sleep(SETTLE);
    assert!(!reader.is_finished(), "read on empty queue did not block");

    queue.write(1, &[9, 8]).unwrap();
    assert_eq!(reader.join().unwrap().unwrap(), [9, 8]);
}

#[test]
fn unblock_releases_parked_writer() {
    let queue = Arc::new(BoundedBlockingQueue::new(1, 1).unwrap());
    queue.write(1, &[0]).unwrap();

    let writer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.write(1, &[1]))
    };

    thread::sleep(SETTLE);
    queue.unblock_for_termination();

    let result = writer.join().unwrap();
    assert!(matches!(result, Err(WavechoError::Unblocked)));
}

#[test]
fn unblock_releases_parked_reader() {
    let queue = Arc::new(BoundedBlockingQueue::new(1, 1).unwrap());

    let reader = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut out = [0u8; 1];
            queue.read(1, &mut out)
        })
    };

    thread::sleep(SETTLE);
    queue.unblock_for_termination();

    assert!(reader.join().unwrap().unwrap_err().is_unblocked());
}

#[test]
fn unblock_releases_many_parked_threads() {
    let queue = Arc::new(BoundedBlockingQueue::new(1, 1).unwrap());
    queue.write(1, &[0]).unwrap();

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.write(1, &[i]))
        })
        .collect();

    // drain the one stored slot so readers also park once it is gone
    let mut out = [0u8; 1];
    queue.read(1, &mut out).unwrap();

    thread::sleep(SETTLE);
    queue.unblock_for_termination();

    let mut unblocked = 0;
    for writer in writers {
        match writer.join().unwrap() {
            Ok(()) => {}
            Err(WavechoError::Unblocked) => unblocked += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    // the freed slot lets exactly one writer through before termination
    assert!(unblocked >= 3);
}

#[test]
fn multi_slot_write_preserves_order() {
    let queue = Arc::new(BoundedBlockingQueue::new(2, 2).unwrap());
    let payload: Vec<u8> = (0..20).collect();

    let writer = {
        let queue = Arc::clone(&queue);
        let payload = payload.clone();
        thread::spawn(move || queue.write(10, &payload))
    };

    let mut received = vec![0u8; 20];
    queue.read(10, &mut received).unwrap();
    writer.join().unwrap().unwrap();

    assert_eq!(received, payload);
}
