//! Ordinary least-squares linear fit
//!
//! The analyzers fit pressure against time in minutes over small windows
//! (tens to a few hundred points). Sums are accumulated in `f64`: pressure
//! values sit around 10⁵ Pa, so `x·y` cross-terms would shred `f32`
//! precision long before the window fills.

/// A fitted line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope in y-units per x-unit.
    pub slope: f64,
    /// Value of the line at x = 0.
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through `points` by ordinary least squares.
///
/// Returns `None` for fewer than two points or when all x-values
/// coincide (no unique solution).
pub fn fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;

    for &(x, y) in points {
        sum_x += x;
        sum_y += y;
        sum_xx += x * x;
        sum_xy += x * y;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Some(LinearFit { slope, intercept })
}
