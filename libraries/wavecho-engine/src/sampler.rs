//! Periodic frequency-response sampler
//!
//! Independent of playback, the sampler wakes every period, copies the
//! coefficients and gains out of the control register, evaluates the
//! combined equalizer response on the plot grid, and publishes it. The
//! register lock is released before the plot lock is taken.

use crate::config::EngineConfig;
use crate::control::SharedControlRegister;
use crate::plot::PlotBuffer;
use crate::termination::TerminationSignal;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use wavecho_core::Semaphore;
use wavecho_dsp::response::equalizer_magnitude_db;

/// Upper bound on how long the sampler sleeps before rechecking shutdown
const SHUTDOWN_POLL: Duration = Duration::from_millis(20);

pub struct FrequencyResponseSampler {
    register: Arc<SharedControlRegister>,
    plot: Arc<PlotBuffer>,
    terminated: Arc<Semaphore>,
    grid: Vec<f64>,
    period: Duration,
}

impl FrequencyResponseSampler {
    pub fn new(
        register: Arc<SharedControlRegister>,
        plot: Arc<PlotBuffer>,
        terminated: Arc<Semaphore>,
        config: &EngineConfig,
    ) -> Self {
        let grid = plot.frequencies();
        Self {
            register,
            plot,
            terminated,
            grid,
            period: config.sampler_period(),
        }
    }

    /// Evaluate and publish one curve
    ///
    /// Returns `false` without publishing once shutdown has been requested.
    pub fn tick(&self) -> bool {
        let snapshot = self.register.read_snapshot();
        if snapshot.shutdown_requested {
            return false;
        }

        let curve = equalizer_magnitude_db(
            &snapshot.filter_bank,
            &snapshot.eq_gains,
            snapshot.eq_output_gain,
            &self.grid,
            self.register.sample_rate_hz(),
        );
        self.plot.publish(&curve);
        true
    }

    /// Tick every period until shutdown, then signal the termination semaphore
    pub fn run(self) {
        let _signal = TerminationSignal::new(&self.terminated);
        info!(points = self.grid.len(), period_ms = self.period.as_millis(), "sampler started");

        while self.tick() {
            self.wait_period();
        }

        info!("sampler terminated");
    }

    fn wait_period(&self) {
        let deadline = Instant::now() + self.period;
        loop {
            let now = Instant::now();
            if now >= deadline || self.register.is_shutdown_requested() {
                return;
            }
            thread::sleep((deadline - now).min(SHUTDOWN_POLL));
        }
    }
}
