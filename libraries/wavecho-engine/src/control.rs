//! Shared control register
//!
//! Configuration flows from the control thread to the workers through a
//! single mutex-guarded [`ControlSnapshot`]. Readers copy the whole block
//! under the lock and release it before processing, so a worker may act on
//! values that are one update stale but never on a half-written update.

use crate::error::{EngineError, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use wavecho_dsp::{EchoParams, EqGains, FilterBank, FilterSettings};

/// Consistent copy of every control field
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSnapshot {
    /// File the next play request opens
    pub input_path: Option<Arc<Path>>,
    /// Level of the play control; clearing it stops a streaming worker
    pub play_requested: bool,
    /// Counts play requests, so each one starts at most one playback
    pub play_generation: u64,
    /// Workers exit at their next check
    pub shutdown_requested: bool,
    /// Echo runs before the equalizer when enabled
    pub echo_enabled: bool,
    /// Delay, gain and feedback, already range-checked
    pub echo_params: EchoParams,
    /// A disabled equalizer is bypassed, not run with zero gains
    pub eq_enabled: bool,
    /// Per-band mix gains A
    pub eq_gains: EqGains,
    /// Output gain B applied after band mixing
    pub eq_output_gain: f64,
    /// Low, band and high coefficients, replaced as one unit
    pub filter_bank: FilterBank,
}

impl ControlSnapshot {
    /// Startup state: idle, effects off, neutral gains
    pub fn initial(filter_bank: FilterBank) -> Self {
        Self {
            input_path: None,
            play_requested: false,
            play_generation: 0,
            shutdown_requested: false,
            echo_enabled: false,
            echo_params: EchoParams::default(),
            eq_enabled: false,
            eq_gains: EqGains::default(),
            eq_output_gain: 1.0,
            filter_bank,
        }
    }
}

/// Mutex-guarded control block shared by the control context and both workers
#[derive(Debug)]
pub struct SharedControlRegister {
    inner: Mutex<ControlSnapshot>,
    sample_rate_hz: f64,
    echo_buffer_len: usize,
}

impl SharedControlRegister {
    /// Create a register whose filters are designed from `settings`
    ///
    /// `sample_rate_hz` is the design rate and the echo delay-line length.
    pub fn new(settings: &FilterSettings, sample_rate_hz: u32) -> Self {
        let rate = f64::from(sample_rate_hz);
        Self {
            inner: Mutex::new(ControlSnapshot::initial(settings.design(rate))),
            sample_rate_hz: rate,
            echo_buffer_len: sample_rate_hz as usize,
        }
    }

    /// Copy the whole register under the lock
    pub fn read_snapshot(&self) -> ControlSnapshot {
        self.lock().clone()
    }

    /// Sample rate the coefficients are designed for
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.lock().shutdown_requested
    }

    pub fn set_input_path(&self, path: impl AsRef<Path>) {
        let path: Arc<Path> = Arc::from(path.as_ref());
        debug!(path = %path.display(), "input path set");
        self.lock().input_path = Some(path);
    }

    /// Set the play control
    ///
    /// Every `true` is a new play request, even when play is already set, so
    /// a file that has finished plays again.
    pub fn set_play(&self, play: bool) {
        let mut inner = self.lock();
        inner.play_requested = play;
        if play {
            inner.play_generation += 1;
        }
    }

    /// Clear the play request; a streaming worker returns to idle
    pub fn request_stop(&self) {
        self.set_play(false);
    }

    pub fn set_shutdown(&self) {
        self.lock().shutdown_requested = true;
    }

    pub fn set_echo_enabled(&self, enabled: bool) {
        self.lock().echo_enabled = enabled;
    }

    /// Replace the echo parameters
    ///
    /// The delay must be shorter than the delay line; gain and feedback must
    /// lie in [0, 1].
    pub fn set_echo_params(&self, params: EchoParams) -> Result<()> {
        if params.delay_samples >= self.echo_buffer_len {
            return Err(EngineError::InvalidParameter(format!(
                "echo delay {} samples exceeds the {}-sample delay line",
                params.delay_samples, self.echo_buffer_len
            )));
        }
        for (name, value) in [("gain", params.gain), ("feedback", params.feedback)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidParameter(format!(
                    "echo {name} {value} outside [0, 1]"
                )));
            }
        }

        self.lock().echo_params = params;
        Ok(())
    }

    pub fn set_eq_enabled(&self, enabled: bool) {
        self.lock().eq_enabled = enabled;
    }

    /// Replace the per-band gains
    pub fn set_eq_gains(&self, gains: EqGains) -> Result<()> {
        if ![gains.low, gains.band, gains.high].iter().all(|g| g.is_finite()) {
            return Err(EngineError::InvalidParameter(format!(
                "equalizer gains must be finite: {gains:?}"
            )));
        }

        self.lock().eq_gains = gains;
        Ok(())
    }

    /// Set the output gain B, accepted in (0, 1]
    pub fn set_eq_output_gain(&self, gain: f64) -> Result<()> {
        if !(gain > 0.0 && gain <= 1.0) {
            return Err(EngineError::InvalidParameter(format!(
                "output gain {gain} outside (0, 1]"
            )));
        }

        self.lock().eq_output_gain = gain;
        Ok(())
    }

    /// Replace all three coefficient sets in one assignment
    pub fn set_filter_coefficients(&self, bank: FilterBank) {
        self.lock().filter_bank = bank;
    }

    /// Design a new bank from `settings` and install it
    ///
    /// Design happens before the lock is taken.
    pub fn set_filter_settings(&self, settings: &FilterSettings) -> Result<()> {
        settings.validate(self.sample_rate_hz)?;
        let bank = settings.design(self.sample_rate_hz);
        debug!(?settings, "filters redesigned");
        self.set_filter_coefficients(bank);
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, ControlSnapshot> {
        // every write is a plain field assignment, so a poisoned guard is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
