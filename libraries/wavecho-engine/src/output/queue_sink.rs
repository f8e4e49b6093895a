use std::sync::Arc;
use wavecho_core::{
    AudioFormat, BoundedBlockingQueue, Result, SampleSink, SinkOpener, StereoFrame, WavechoError,
};

/// Writes blocks into a bounded queue, one stereo frame per slot
///
/// Blocks while the queue is full. Returns `WavechoError::Unblocked` once the
/// queue has been released for termination.
pub struct QueueSink {
    queue: Arc<BoundedBlockingQueue>,
    bytes: Vec<u8>,
}

impl QueueSink {
    /// Wrap `queue`, whose slots must be exactly one frame wide
    pub fn new(queue: Arc<BoundedBlockingQueue>) -> Result<Self> {
        if queue.slot_size() != StereoFrame::BYTES {
            return Err(WavechoError::InvalidQueueGeometry {
                slot_size: queue.slot_size(),
                slot_count: queue.slot_count(),
            });
        }

        Ok(Self {
            queue,
            bytes: Vec::new(),
        })
    }
}

impl SampleSink for QueueSink {
    fn write_block(&mut self, block: &[StereoFrame]) -> Result<()> {
        self.bytes.clear();
        self.bytes.reserve(block.len() * StereoFrame::BYTES);
        for frame in block {
            self.bytes.extend_from_slice(&frame.to_le_bytes());
        }

        self.queue.write(block.len(), &self.bytes)
    }
}

/// Hands out [`QueueSink`]s over one shared queue
///
/// The format is not checked; whoever drains the queue decides the rate.
#[derive(Clone)]
pub struct QueueSinkOpener {
    queue: Arc<BoundedBlockingQueue>,
}

impl QueueSinkOpener {
    pub fn new(queue: Arc<BoundedBlockingQueue>) -> Self {
        Self { queue }
    }

    pub fn queue(&self) -> &Arc<BoundedBlockingQueue> {
        &self.queue
    }
}

impl SinkOpener for QueueSinkOpener {
    fn open(&mut self, _format: &AudioFormat) -> Result<Box<dyn SampleSink>> {
        Ok(Box::new(QueueSink::new(Arc::clone(&self.queue))?))
    }

    fn blocking_queue(&self) -> Option<Arc<BoundedBlockingQueue>> {
        Some(Arc::clone(&self.queue))
    }
}

/// Decode drained queue bytes into frames
#[cfg_attr(not(feature = "cpal-output"), allow(dead_code))]
pub(crate) fn frames_from_bytes(bytes: &[u8]) -> impl Iterator<Item = StereoFrame> + '_ {
    bytes
        .chunks_exact(StereoFrame::BYTES)
        .map(|chunk| StereoFrame::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}
