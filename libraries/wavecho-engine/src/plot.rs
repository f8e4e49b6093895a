/// Lock-guarded frequency response for visualizers
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use wavecho_dsp::response::log_frequency_grid;

/// One point of the plotted response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub frequency_hz: f64,
    /// Magnitude in dB, already clipped for display
    pub magnitude_db: f64,
}

#[derive(Debug)]
struct PlotState {
    points: Vec<PlotPoint>,
    updates: u64,
}

/// Fixed-length (frequency, dB) curve rewritten wholesale by the sampler
///
/// The frequency of every index is fixed at construction; only magnitudes
/// change.
#[derive(Debug)]
pub struct PlotBuffer {
    state: Mutex<PlotState>,
}

impl PlotBuffer {
    /// Create a flat (0 dB) curve over a log grid from `min_hz` to `max_hz`
    pub fn new(points: usize, min_hz: f64, max_hz: f64) -> Self {
        let points = log_frequency_grid(points, min_hz, max_hz)
            .into_iter()
            .map(|frequency_hz| PlotPoint {
                frequency_hz,
                magnitude_db: 0.0,
            })
            .collect();

        Self {
            state: Mutex::new(PlotState { points, updates: 0 }),
        }
    }

    /// Frequencies of the grid, in index order
    pub fn frequencies(&self) -> Vec<f64> {
        self.lock().points.iter().map(|p| p.frequency_hz).collect()
    }

    /// Copy of the whole curve
    pub fn snapshot(&self) -> Vec<PlotPoint> {
        self.lock().points.clone()
    }

    /// Replace every magnitude; extra or missing values are ignored
    pub fn publish(&self, magnitudes_db: &[f64]) {
        let mut state = self.lock();
        for (point, &db) in state.points.iter_mut().zip(magnitudes_db) {
            point.magnitude_db = db;
        }
        state.updates += 1;
    }

    /// Number of times the curve has been published
    pub fn updates(&self) -> u64 {
        self.lock().updates
    }

    pub fn len(&self) -> usize {
        self.lock().points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, PlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
