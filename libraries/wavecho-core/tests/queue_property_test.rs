//! Property-based tests for the bounded queue
//!
//! A random sequence of non-blocking operations is replayed against the queue
//! and against a `VecDeque` model; both must agree after every step.

use proptest::prelude::*;
use std::collections::VecDeque;
use wavecho_core::BoundedBlockingQueue;

#[derive(Debug, Clone)]
enum Op {
    Write(Vec<u8>),
    Read(usize),
}

fn op_strategy(slot_size: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), slot_size..=slot_size * 4)
            .prop_map(move |mut bytes| {
                bytes.truncate(bytes.len() / slot_size * slot_size);
                Op::Write(bytes)
            }),
        (1usize..4).prop_map(Op::Read),
    ]
}

proptest! {
    /// Property: the queue behaves like a FIFO of slots and never exceeds capacity
    #[test]
    fn matches_fifo_model(
        slot_count in 1usize..8,
        ops in prop::collection::vec(op_strategy(3), 1..60)
    ) {
        let slot_size = 3;
        let queue = BoundedBlockingQueue::new(slot_size, slot_count).unwrap();
        let mut model: VecDeque<Vec<u8>> = VecDeque::new();

        for op in ops {
            match op {
                Op::Write(bytes) => {
                    let n = bytes.len() / slot_size;
                    // only issue writes that fit, so the test never parks
                    if model.len() + n <= slot_count {
                        queue.write(n, &bytes).unwrap();
                        model.extend(bytes.chunks_exact(slot_size).map(<[u8]>::to_vec));
                    }
                }
                Op::Read(n) => {
                    let mut out = vec![0u8; n * slot_size];
                    let copied = queue.try_read(n, &mut out).unwrap();
                    prop_assert_eq!(copied, n.min(model.len()));
                    for slot in out[..copied * slot_size].chunks_exact(slot_size) {
                        let expected = model.pop_front().unwrap();
                        prop_assert_eq!(slot, expected.as_slice());
                    }
                }
            }

            prop_assert_eq!(queue.used_slots(), model.len());
            prop_assert!(queue.used_slots() <= queue.capacity());
            prop_assert_eq!(queue.is_empty(), model.is_empty());
            prop_assert_eq!(queue.is_full(), model.len() == slot_count);
        }
    }
}
