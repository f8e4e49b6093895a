/// Engine facade: owns the shared state and both worker threads
use crate::config::EngineConfig;
use crate::control::SharedControlRegister;
use crate::error::{EngineError, Result};
use crate::plot::{PlotBuffer, PlotPoint};
use crate::render::{AudioRenderWorker, RenderStatus};
use crate::sampler::FrequencyResponseSampler;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{error, info};
use wavecho_core::{BoundedBlockingQueue, Semaphore, SinkOpener, SourceOpener};

const RENDER_THREAD: &str = "wavecho-render";
const SAMPLER_THREAD: &str = "wavecho-sampler";

/// Running engine
///
/// Control edits go through [`register`](Self::register). Dropping the
/// engine shuts it down.
///
/// # Example
///
/// ```rust,no_run
/// use wavecho_engine::{Engine, EngineConfig, WavFileSinkOpener, WavSourceOpener};
///
/// let mut engine = Engine::start(
///     EngineConfig::default(),
///     WavSourceOpener::new(),
///     WavFileSinkOpener::new("out.wav"),
/// )?;
///
/// engine.register().set_input_path("in.wav");
/// engine.register().set_play(true);
/// // ...
/// engine.shutdown()?;
/// # Ok::<(), wavecho_engine::EngineError>(())
/// ```
pub struct Engine {
    config: EngineConfig,
    register: Arc<SharedControlRegister>,
    plot: Arc<PlotBuffer>,
    status: Arc<Mutex<RenderStatus>>,
    terminated: Arc<Semaphore>,
    output_queue: Option<Arc<BoundedBlockingQueue>>,
    workers: Vec<(&'static str, JoinHandle<()>)>,
}

impl Engine {
    /// Validate `config`, build the shared state, and spawn both workers
    pub fn start<S, K>(config: EngineConfig, sources: S, sinks: K) -> Result<Self>
    where
        S: SourceOpener + 'static,
        K: SinkOpener + 'static,
    {
        config.validate()?;

        let register = Arc::new(SharedControlRegister::new(
            &config.filters,
            config.sample_rate_hz,
        ));
        let plot = Arc::new(PlotBuffer::new(
            config.plot_points,
            config.plot_min_hz,
            config.plot_max_hz,
        ));
        let terminated = Arc::new(Semaphore::new(0));
        let output_queue = sinks.blocking_queue();

        let render = AudioRenderWorker::new(
            Arc::clone(&register),
            Box::new(sources),
            Box::new(sinks),
            Arc::clone(&terminated),
            &config,
        );
        let sampler = FrequencyResponseSampler::new(
            Arc::clone(&register),
            Arc::clone(&plot),
            Arc::clone(&terminated),
            &config,
        );

        let mut engine = Self {
            status: render.status_handle(),
            config,
            register,
            plot,
            terminated,
            output_queue,
            workers: Vec::with_capacity(2),
        };
        engine.spawn(RENDER_THREAD, move || render.run())?;
        engine.spawn(SAMPLER_THREAD, move || sampler.run())?;

        info!(
            sample_rate = engine.config.sample_rate_hz,
            block_frames = engine.config.block_frames,
            "engine started"
        );
        Ok(engine)
    }

    fn spawn<F>(&mut self, name: &'static str, body: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(body)
            .map_err(|source| EngineError::Thread { name, source })?;
        self.workers.push((name, handle));
        Ok(())
    }

    /// Control register shared with the workers
    pub fn register(&self) -> &Arc<SharedControlRegister> {
        &self.register
    }

    /// Plot buffer published by the sampler
    pub fn plot_buffer(&self) -> &Arc<PlotBuffer> {
        &self.plot
    }

    /// Current frequency response curve
    pub fn plot(&self) -> Vec<PlotPoint> {
        self.plot.snapshot()
    }

    /// Latest render worker status
    pub fn status(&self) -> RenderStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True until [`shutdown`](Self::shutdown) has completed
    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Stop both workers and wait for them to exit
    ///
    /// Sets the shutdown flag, releases the output queue so a worker parked
    /// on a full queue returns, waits for one termination signal per worker,
    /// then joins the threads. Calling it again is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.workers.is_empty() {
            return Ok(());
        }
        info!("engine shutting down");

        self.register.set_shutdown();
        if let Some(queue) = &self.output_queue {
            queue.unblock_for_termination();
        }

        for _ in 0..self.workers.len() {
            self.terminated.wait();
        }

        let mut result = Ok(());
        for (name, handle) in self.workers.drain(..) {
            if handle.join().is_err() {
                error!(thread = name, "worker panicked");
                result = Err(EngineError::WorkerPanicked(name));
            }
        }

        info!("engine stopped");
        result
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!(error = %e, "engine shutdown failed");
        }
    }
}
