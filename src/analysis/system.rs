//! Pressure-System Classification
//!
//! Synoptic-scale weather sorts into three coarse regimes by surface
//! pressure: lows (cyclonic, unsettled), highs (anticyclonic, settled) and
//! the band between them. Classification comes in two forms:
//!
//! - [`by_pressure`] classifies a single absolute value against the
//!   101000 / 101500 Pa thresholds;
//! - [`by_trend`] fits a line through a reading window and reports the
//!   regime the series is heading into, promoting toward High only when
//!   the latest value already clears the threshold (a rise inside a deep
//!   low is a filling low, not a high).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::analysis::regression;
use crate::config::Config;
use crate::corrections::smoothing;
use crate::reading::Reading;
use crate::time::MS_PER_MINUTE;

/// Mean sea-level pressure of the standard atmosphere, Pa.
pub const STANDARD_PRESSURE_PA: f32 = 101_325.0;

/// Pressures at or below this are a low-pressure system, Pa.
pub const LOW_PRESSURE_PA: f32 = 101_000.0;

/// Pressures at or above this are a high-pressure system, Pa.
pub const HIGH_PRESSURE_PA: f32 = 101_500.0;

/// Coarse synoptic pressure regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PressureSystem {
    /// At or below [`LOW_PRESSURE_PA`].
    Low,
    /// Between the two thresholds.
    Normal,
    /// At or above [`HIGH_PRESSURE_PA`].
    High,
}

impl PressureSystem {
    /// Human-readable regime name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        }
    }
}

/// Classify an absolute pressure value.
pub fn by_pressure(pressure_pa: f32) -> PressureSystem {
    if pressure_pa <= LOW_PRESSURE_PA {
        PressureSystem::Low
    } else if pressure_pa >= HIGH_PRESSURE_PA {
        PressureSystem::High
    } else {
        PressureSystem::Normal
    }
}

/// Classify the regime a reading series is trending into.
///
/// The series is smoothed first when the configuration asks for it, then
/// fitted by least squares over minutes. Returns `None` for fewer than two
/// readings or a window too degenerate to fit.
pub fn by_trend(readings: &[Reading], config: &Config) -> Option<PressureSystem> {
    if readings.len() < 2 {
        return None;
    }

    let mut series: Vec<f32> = readings
        .iter()
        .map(|r| r.pressure_by_choice(config))
        .collect();
    if config.apply_smoothing {
        series = smoothing::process(&series, config.smoothing_sigma, config.smoothing_alpha);
    }

    let base = readings[0].timestamp;
    let points: Vec<(f64, f64)> = readings
        .iter()
        .zip(&series)
        .map(|(r, &pressure)| {
            let minutes = (r.timestamp - base) as f64 / MS_PER_MINUTE as f64;
            (minutes, pressure as f64)
        })
        .collect();

    let line = regression::fit(&points)?;
    let latest = series[series.len() - 1];

    let trending = if line.slope > 0.0 {
        if latest >= HIGH_PRESSURE_PA {
            PressureSystem::High
        } else if latest > LOW_PRESSURE_PA {
            PressureSystem::Normal
        } else {
            PressureSystem::Low
        }
    } else if line.slope < 0.0 {
        if latest <= LOW_PRESSURE_PA {
            PressureSystem::Low
        } else if latest < HIGH_PRESSURE_PA {
            PressureSystem::Normal
        } else {
            PressureSystem::High
        }
    } else {
        PressureSystem::Normal
    };

    Some(trending)
}

/// Current regime and the regime the series is heading into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemForecast {
    /// Regime of the latest pressure value.
    pub current: PressureSystem,
    /// Regime the window is trending into; `None` with under two readings.
    pub trending: Option<PressureSystem>,
}

/// Combine the absolute and trend classifications.
pub fn forecast(pressure_pa: f32, readings: &[Reading], config: &Config) -> SystemForecast {
    SystemForecast {
        current: by_pressure(pressure_pa),
        trending: by_trend(readings, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Calculated, ReadingMeta, to_kelvin};
    use crate::time::Timestamp;

    fn reading(minute: u64, pressure: f32) -> Reading {
        Reading {
            timestamp: minute * MS_PER_MINUTE as Timestamp,
            raw_pressure: pressure,
            meta: ReadingMeta {
                altitude: 0.0,
                temperature: to_kelvin(15.0),
                humidity: None,
                wind_direction: None,
                wind_speed: None,
                latitude: None,
            },
            calculated: Calculated {
                pressure_asl: pressure,
                diurnal_pressure: pressure,
                diurnal_pressure_asl: pressure,
                smoothing_delta: 0.0,
            },
        }
    }

    #[test]
    fn absolute_thresholds_inclusive() {
        assert_eq!(by_pressure(100_500.0), PressureSystem::Low);
        assert_eq!(by_pressure(101_000.0), PressureSystem::Low);
        assert_eq!(by_pressure(101_001.0), PressureSystem::Normal);
        assert_eq!(by_pressure(101_499.0), PressureSystem::Normal);
        assert_eq!(by_pressure(101_500.0), PressureSystem::High);
        assert_eq!(by_pressure(102_500.0), PressureSystem::High);
    }

    #[test]
    fn rising_promotes_only_past_threshold() {
        let config = Config::default();

        let into_high = [reading(0, 101_400.0), reading(60, 101_520.0)];
        assert_eq!(by_trend(&into_high, &config), Some(PressureSystem::High));

        // Rising but still below the high threshold
        let filling = [reading(0, 101_100.0), reading(60, 101_300.0)];
        assert_eq!(by_trend(&filling, &config), Some(PressureSystem::Normal));

        // Rising inside a deep low stays a low
        let deep = [reading(0, 100_500.0), reading(60, 100_700.0)];
        assert_eq!(by_trend(&deep, &config), Some(PressureSystem::Low));
    }

    #[test]
    fn falling_demotes_only_past_threshold() {
        let config = Config::default();

        let into_low = [reading(0, 101_200.0), reading(60, 100_900.0)];
        assert_eq!(by_trend(&into_low, &config), Some(PressureSystem::Low));

        let weakening = [reading(0, 101_400.0), reading(60, 101_200.0)];
        assert_eq!(by_trend(&weakening, &config), Some(PressureSystem::Normal));

        // Falling but still above the high threshold
        let high = [reading(0, 102_000.0), reading(60, 101_800.0)];
        assert_eq!(by_trend(&high, &config), Some(PressureSystem::High));
    }

    #[test]
    fn flat_series_reads_normal() {
        let config = Config::default();
        let flat = [reading(0, 101_325.0), reading(60, 101_325.0)];
        assert_eq!(by_trend(&flat, &config), Some(PressureSystem::Normal));
    }

    #[test]
    fn too_few_readings() {
        let config = Config::default();
        assert_eq!(by_trend(&[], &config), None);
        assert_eq!(by_trend(&[reading(0, 101_325.0)], &config), None);
    }

    #[test]
    fn smoothing_tames_a_spiked_window() {
        let mut config = Config::default();
        config.apply_smoothing = true;

        // A single trailing spike would otherwise read as rising High
        let readings = [
            reading(0, 101_450.0),
            reading(15, 101_445.0),
            reading(30, 101_440.0),
            reading(45, 101_435.0),
            reading(60, 101_600.0),
        ];
        assert_eq!(by_trend(&readings, &config), Some(PressureSystem::Normal));
    }

    #[test]
    fn forecast_combines_both_views() {
        let config = Config::default();
        let readings = [reading(0, 101_400.0), reading(60, 101_520.0)];
        let result = forecast(101_520.0, &readings, &config);
        assert_eq!(result.current, PressureSystem::High);
        assert_eq!(result.trending, Some(PressureSystem::High));
    }
}
