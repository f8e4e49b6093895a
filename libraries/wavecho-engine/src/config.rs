/// Engine configuration
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use wavecho_core::{AudioFormat, SampleRate};
use wavecho_dsp::FilterSettings;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Rate the filters are designed for; also the echo delay-line length
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,

    /// Stereo frames per block handed to the output sink
    #[serde(default = "default_block_frames")]
    pub block_frames: usize,

    /// Blocks buffered between the render worker and the audio device
    #[serde(default = "default_output_queue_blocks")]
    pub output_queue_blocks: usize,

    #[serde(default = "default_plot_points")]
    pub plot_points: usize,

    #[serde(default = "default_plot_min_hz")]
    pub plot_min_hz: f64,

    #[serde(default = "default_plot_max_hz")]
    pub plot_max_hz: f64,

    #[serde(default = "default_sampler_period_ms")]
    pub sampler_period_ms: u64,

    /// Sleep between register polls while idle
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,

    #[serde(default)]
    pub filters: FilterSettings,
}

impl EngineConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables use the `WAVECHO_` prefix and `__` for nesting,
    /// e.g. `WAVECHO_BLOCK_FRAMES=1024` or `WAVECHO_FILTERS__BAND_Q=2.0`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("WAVECHO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate_hz == 0 {
            return Err(EngineError::Config("sample_rate_hz must be positive".to_string()));
        }

        if self.block_frames == 0 || self.output_queue_blocks == 0 {
            return Err(EngineError::Config(
                "block_frames and output_queue_blocks must be positive".to_string(),
            ));
        }

        if self.plot_points == 0 {
            return Err(EngineError::Config("plot_points must be positive".to_string()));
        }

        if !(self.plot_min_hz > 0.0 && self.plot_min_hz < self.plot_max_hz) {
            return Err(EngineError::Config(format!(
                "plot range {}..{} Hz is empty or non-positive",
                self.plot_min_hz, self.plot_max_hz
            )));
        }

        if self.sampler_period_ms == 0 {
            return Err(EngineError::Config(
                "sampler_period_ms must be positive".to_string(),
            ));
        }

        self.filters
            .validate(f64::from(self.sample_rate_hz))
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn sample_rate(&self) -> SampleRate {
        SampleRate::new(self.sample_rate_hz)
    }

    /// Stream format the engine renders by default
    pub fn output_format(&self) -> AudioFormat {
        AudioFormat::new(self.sample_rate(), 2, 16)
    }

    pub fn sampler_period(&self) -> Duration {
        Duration::from_millis(self.sampler_period_ms)
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    /// Slots needed by an output queue holding `output_queue_blocks` blocks
    pub fn output_queue_slots(&self) -> usize {
        self.block_frames.saturating_mul(self.output_queue_blocks)
    }
}

// Default values
fn default_sample_rate_hz() -> u32 {
    44_100
}

fn default_block_frames() -> usize {
    4096
}

fn default_output_queue_blocks() -> usize {
    4
}

fn default_plot_points() -> usize {
    512
}

fn default_plot_min_hz() -> f64 {
    1.0
}

fn default_plot_max_hz() -> f64 {
    20_000.0
}

fn default_sampler_period_ms() -> u64 {
    500
}

fn default_idle_poll_ms() -> u64 {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate_hz(),
            block_frames: default_block_frames(),
            output_queue_blocks: default_output_queue_blocks(),
            plot_points: default_plot_points(),
            plot_min_hz: default_plot_min_hz(),
            plot_max_hz: default_plot_max_hz(),
            sampler_period_ms: default_sampler_period_ms(),
            idle_poll_ms: default_idle_poll_ms(),
            filters: FilterSettings::default(),
        }
    }
}
