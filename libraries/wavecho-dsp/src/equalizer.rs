/// Three-band parametric equalizer
///
/// Each band filters the dry signal, is scaled by its own gain and mixed back
/// into the dry signal, then the sum is scaled by the output gain:
///
/// ```text
/// y = (x + A_low·LP(x) + A_band·BP(x) + A_high·HP(x)) · B
/// ```
///
/// A gain of 0 removes a band from the mix; -1 cancels its pass region.
use crate::filter::{FilterBank, FilterKind, FilterState};
use serde::{Deserialize, Serialize};
use wavecho_core::StereoFrame;

/// Stereo channel selector for per-channel filter history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Left channel
    Left,
    /// Right channel
    Right,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Per-band mix gains
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EqGains {
    /// Low-pass band gain (A_low)
    pub low: f64,
    /// Band-pass band gain (A_band)
    pub band: f64,
    /// High-pass band gain (A_high)
    pub high: f64,
}

impl EqGains {
    /// Gain of a single band
    pub fn get(&self, kind: FilterKind) -> f64 {
        match kind {
            FilterKind::Low => self.low,
            FilterKind::Band => self.band,
            FilterKind::High => self.high,
        }
    }
}

/// Equalizer runtime: six independent filter histories (3 bands × 2 channels)
///
/// Coefficients and gains are supplied on every call so the caller can
/// snapshot them from shared control state once per sample.
#[derive(Debug, Clone, Default)]
pub struct ParametricEqualizer {
    states: [[FilterState; 3]; 2],
}

impl ParametricEqualizer {
    /// Create an equalizer with zeroed history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Equalize one sample of one channel
    pub fn process_sample(
        &mut self,
        x: f64,
        channel: Channel,
        bank: &FilterBank,
        gains: &EqGains,
        output_gain: f64,
    ) -> f64 {
        let states = &mut self.states[channel.index()];

        let mut y = x;
        for kind in FilterKind::ALL {
            let filtered = states[kind.index()].process(x, bank.get(kind));
            y += gains.get(kind) * filtered;
        }

        y * output_gain
    }

    /// Equalize one stereo frame, saturating the result back to 16 bits
    pub fn process_frame(
        &mut self,
        frame: StereoFrame,
        bank: &FilterBank,
        gains: &EqGains,
        output_gain: f64,
    ) -> StereoFrame {
        let left = self.process_sample(
            f64::from(frame.left),
            Channel::Left,
            bank,
            gains,
            output_gain,
        );
        let right = self.process_sample(
            f64::from(frame.right),
            Channel::Right,
            bank,
            gains,
            output_gain,
        );

        StereoFrame::new(saturate(left), saturate(right))
    }

    /// Clear all six histories
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Truncate toward zero and clamp to the i16 range
fn saturate(sample: f64) -> i16 {
    // float-to-int `as` saturates and maps NaN to 0
    sample as i16
}
