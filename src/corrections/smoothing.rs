//! Outlier Smoothing for the Trailing-Hour Series
//!
//! Marine barometer feeds spike: a slammed hatch, a gust across the vent,
//! a flaky I2C read. A single spiked reading is enough to flip the trend
//! classification from Steady to Rapidly, so readings are screened against
//! their recent neighborhood before the analyzers see them.
//!
//! The screen is statistical, not physical: the trailing-hour series is
//! taken as the population, and any point deviating more than a configured
//! multiple of the population standard deviation from the mean is treated
//! as an outlier. An outlier is repaired one of two ways:
//!
//! - when its deviation *opposes* the direction its neighbors agree on
//!   (series falling, spike upward), it is replaced by the neighbor
//!   midpoint - a half-step back onto the local trend;
//! - otherwise (spike exaggerating the trend, or a trailing point with no
//!   next neighbor) it is blended with its predecessor by an exponential
//!   moving average, `α·outlier + (1−α)·previous`.
//!
//! Repaired values are rounded to the nearest pascal. The raw reading is
//! never discarded; the store keeps it and records only the delta the
//! smoothing applied.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Smoothing runs only once more than this many readings exist within the
/// trailing hour.
pub const MIN_TRAILING_READINGS: usize = 3;

fn population_stats(series: &[f32]) -> (f64, f64) {
    let n = series.len() as f64;
    let mean = series.iter().map(|v| *v as f64).sum::<f64>() / n;
    let variance = series
        .iter()
        .map(|v| {
            let d = *v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, libm::sqrt(variance))
}

fn sign(value: f64) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Smooth a pressure series, replacing statistical outliers.
///
/// Series shorter than 2 points, or with zero variance, come back
/// unchanged. The first point is never altered - it has no predecessor to
/// blend with.
pub fn process(series: &[f32], sigma_multiple: f32, alpha: f32) -> Vec<f32> {
    let mut smoothed: Vec<f32> = series.to_vec();
    if series.len() < 2 {
        return smoothed;
    }

    let (mean, std_dev) = population_stats(series);
    if std_dev == 0.0 {
        return smoothed;
    }
    let threshold = sigma_multiple as f64 * std_dev;

    for i in 1..series.len() {
        let value = series[i] as f64;
        if libm::fabs(value - mean) <= threshold {
            continue;
        }

        let previous = smoothed[i - 1] as f64;
        let repaired = if i + 1 < series.len() {
            let next = series[i + 1] as f64;
            let midpoint = (previous + next) / 2.0;
            let trend_direction = sign(next - previous);
            let deviation_direction = sign(value - midpoint);

            if trend_direction != 0 && deviation_direction == -trend_direction {
                // Spike against the local trend: half-step back onto it
                midpoint
            } else {
                alpha as f64 * value + (1.0 - alpha as f64) * previous
            }
        } else {
            // Trailing point: only the predecessor is available
            alpha as f64 * value + (1.0 - alpha as f64) * previous
        };

        smoothed[i] = libm::round(repaired) as f32;
    }

    smoothed
}

/// Smooth a series and report its last value.
///
/// Returns `(smoothed_last, delta)` where `delta` is the correction that
/// was applied to the final point (0 when it was not an outlier).
pub fn smooth_latest(series: &[f32], sigma_multiple: f32, alpha: f32) -> (f32, f32) {
    match series.last() {
        Some(&raw_last) => {
            let smoothed = process(series, sigma_multiple, alpha);
            let last = smoothed[smoothed.len() - 1];
            (last, last - raw_last)
        }
        None => (0.0, 0.0),
    }
}
