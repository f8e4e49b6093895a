/// CPAL device output
///
/// A dedicated device thread owns the CPAL `Stream`, which is not `Send` on
/// every platform. The thread is driven through a command channel; the
/// stream callback drains the shared frame queue without ever blocking and
/// plays silence on underrun.
use super::queue_sink::{frames_from_bytes, QueueSink};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info, warn};
use wavecho_core::{
    AudioFormat, BoundedBlockingQueue, Result, SampleSink, SinkOpener, StereoFrame, WavechoError,
};

/// Commands sent to the device thread
enum DeviceCommand {
    /// Drop the stream and exit
    Shutdown,
}

/// Running device thread playing at one sample rate
struct DeviceThread {
    command_tx: Sender<DeviceCommand>,
    handle: Option<JoinHandle<()>>,
    sample_rate: u32,
}

impl DeviceThread {
    /// Spawn the thread and wait until the stream is playing or has failed
    fn start(queue: Arc<BoundedBlockingQueue>, sample_rate: u32) -> Result<Self> {
        let (command_tx, command_rx) = bounded::<DeviceCommand>(4);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let handle = thread::Builder::new()
            .name("wavecho-device".to_string())
            .spawn(move || Self::run(queue, sample_rate, &ready_tx, &command_rx))
            .map_err(|e| WavechoError::device(format!("cannot spawn device thread: {e}")))?;

        let startup = ready_rx
            .recv()
            .unwrap_or_else(|_| Err(WavechoError::device("device thread exited during startup")));

        match startup {
            Ok(()) => {
                info!(sample_rate, "audio device started");
                Ok(Self {
                    command_tx,
                    handle: Some(handle),
                    sample_rate,
                })
            }
            Err(e) => {
                let _ = handle.join();
                Err(e)
            }
        }
    }

    /// Device thread main loop
    ///
    /// Owns the stream for its whole lifetime.
    fn run(
        queue: Arc<BoundedBlockingQueue>,
        sample_rate: u32,
        ready_tx: &Sender<Result<()>>,
        command_rx: &Receiver<DeviceCommand>,
    ) {
        let stream = match build_stream(queue, sample_rate) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));

        // a closed channel means the opener is gone
        while let Ok(command) = command_rx.recv() {
            match command {
                DeviceCommand::Shutdown => break,
            }
        }

        drop(stream);
        info!("audio device stopped");
    }

    fn stop(&mut self) {
        let _ = self.command_tx.send(DeviceCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("device thread panicked");
            }
        }
    }
}

impl Drop for DeviceThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn build_stream(queue: Arc<BoundedBlockingQueue>, sample_rate: u32) -> Result<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| WavechoError::device("no default output device"))?;

    let config = StreamConfig {
        channels: 2,
        sample_rate,
        buffer_size: BufferSize::Default,
    };

    let mut scratch = Vec::new();
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill_from_queue(data, &queue, &mut scratch);
            },
            |err| error!(error = %err, "audio stream error"),
            None,
        )
        .map_err(|e| WavechoError::device(format!("cannot build output stream: {e}")))?;

    stream
        .play()
        .map_err(|e| WavechoError::device(format!("cannot start output stream: {e}")))?;

    Ok(stream)
}

/// Audio callback body: copy whatever frames are queued, pad with silence
fn fill_from_queue(output: &mut [f32], queue: &BoundedBlockingQueue, scratch: &mut Vec<u8>) {
    let frames_wanted = output.len() / 2;
    let bytes_wanted = frames_wanted * StereoFrame::BYTES;
    if scratch.len() < bytes_wanted {
        scratch.resize(bytes_wanted, 0);
    }

    // Unblocked means shutdown: play silence until the stream is dropped
    let frames_read = queue.try_read(frames_wanted, scratch).unwrap_or(0);

    let scale = 1.0 / 32_768.0;
    let mut out = output.chunks_exact_mut(2);
    for (slot, frame) in out
        .by_ref()
        .zip(frames_from_bytes(&scratch[..frames_read * StereoFrame::BYTES]))
    {
        slot[0] = f32::from(frame.left) * scale;
        slot[1] = f32::from(frame.right) * scale;
    }
    for slot in out {
        slot.fill(0.0);
    }
    // odd trailing sample, if the host ever asks for one
    if output.len() % 2 == 1 {
        if let Some(last) = output.last_mut() {
            *last = 0.0;
        }
    }
}

/// Plays rendered blocks through the default output device
///
/// Blocks travel through a [`BoundedBlockingQueue`] of one-frame slots. The
/// device thread starts on the first `open` and restarts when the requested
/// sample rate changes.
pub struct CpalSinkOpener {
    queue: Arc<BoundedBlockingQueue>,
    device: Option<DeviceThread>,
}

impl CpalSinkOpener {
    /// Create an opener whose queue holds `queue_frames` frames
    pub fn new(queue_frames: usize) -> Result<Self> {
        let queue = BoundedBlockingQueue::new(StereoFrame::BYTES, queue_frames)?;
        Ok(Self {
            queue: Arc::new(queue),
            device: None,
        })
    }

    pub fn queue(&self) -> &Arc<BoundedBlockingQueue> {
        &self.queue
    }
}

impl SinkOpener for CpalSinkOpener {
    fn open(&mut self, format: &AudioFormat) -> Result<Box<dyn SampleSink>> {
        let rate = format.sample_rate.as_hz();

        if self.device.as_ref().map(|d| d.sample_rate) != Some(rate) {
            if let Some(mut old) = self.device.take() {
                warn!(from = old.sample_rate, to = rate, "restarting audio device");
                old.stop();
            }
            self.device = Some(DeviceThread::start(Arc::clone(&self.queue), rate)?);
        }

        Ok(Box::new(QueueSink::new(Arc::clone(&self.queue))?))
    }

    fn blocking_queue(&self) -> Option<Arc<BoundedBlockingQueue>> {
        Some(Arc::clone(&self.queue))
    }
}
