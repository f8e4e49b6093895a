/// Feedback echo over a fixed circular delay line
///
/// Both channels are summed to mono, scaled, and written `delay_samples`
/// ahead of the read position. The delayed value is added back to each
/// channel and also fed into the next write, so repeats decay by `feedback`
/// per round trip.
use serde::{Deserialize, Serialize};
use wavecho_core::StereoFrame;

/// Echo parameters, read fresh on every sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EchoParams {
    /// Delay in samples; must be below the buffer length
    pub delay_samples: usize,
    /// Gain applied to the mono input before it enters the delay line
    pub gain: f32,
    /// Gain applied to the previous delayed output before re-entry
    pub feedback: f32,
}

/// Echo runtime: circular `i16` delay line plus the last delayed value
#[derive(Debug, Clone)]
pub struct EchoEffect {
    buffer: Vec<i16>,
    read_index: usize,
    previous_output: i16,
}

impl EchoEffect {
    /// Create an echo whose delay line holds `buffer_len` samples
    ///
    /// One second at the engine sample rate is the intended length. A zero
    /// length is rounded up to one sample.
    #[must_use]
    pub fn new(buffer_len: usize) -> Self {
        Self {
            buffer: vec![0; buffer_len.max(1)],
            read_index: 0,
            previous_output: 0,
        }
    }

    /// Delay line length in samples
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Process one stereo frame
    ///
    /// Delays at or above the buffer length wrap modulo the length.
    pub fn process(&mut self, frame: StereoFrame, params: &EchoParams) -> StereoFrame {
        let len = self.buffer.len();
        let mono = i32::from(frame.left) + i32::from(frame.right);

        // f32 -> i16 `as` truncates toward zero and saturates
        let delayed_in = (mono as f32 * params.gain
            + f32::from(self.previous_output) * params.feedback) as i16;

        let write_index = (self.read_index + params.delay_samples % len) % len;
        self.buffer[write_index] = delayed_in;

        self.previous_output = self.buffer[self.read_index];
        self.read_index = (self.read_index + 1) % len;

        let echo = i32::from(self.previous_output);
        StereoFrame::new(
            saturate(i32::from(frame.left) + echo),
            saturate(i32::from(frame.right) + echo),
        )
    }

    /// Zero the delay line and the feedback memory
    pub fn reset(&mut self) {
        self.buffer.fill(0);
        self.read_index = 0;
        self.previous_output = 0;
    }
}

fn saturate(sample: i32) -> i16 {
    sample.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
