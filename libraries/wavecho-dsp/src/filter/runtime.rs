use super::BiquadCoefficients;

/// Direct Form I history for one filter on one channel
///
/// Coefficients are passed per sample rather than stored, so a coefficient
/// change takes effect on the very next sample without touching the history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl FilterState {
    /// Zeroed history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample and advance the history
    #[inline]
    pub fn process(&mut self, x: f64, coeffs: &BiquadCoefficients) -> f64 {
        let y = coeffs.b0 * x + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;

        y
    }

    /// Clear the history
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
