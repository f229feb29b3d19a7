//! Two-Window Pressure-Trend Classification
//!
//! The classic marine-barometer rule reads the tendency over the last
//! hours: a fall of a few hectopascal over three hours announces wind, a
//! rapid fall announces a gale. This analyzer computes the rate of change
//! over two windows, one hour and three hours, classifies each against a
//! fixed ratio ladder and reports the more severe of the two. The short
//! window reacts to fresh developments, the long window keeps a slow
//! steady fall from hiding inside hourly noise.
//!
//! Rate of change is pascal per minute between the first and last reading
//! of the window:
//!
//! ```text
//! Ratio (Pa/min)   Class      Severity    ~Pa per 3 h
//! -------------------------------------------------
//! < 0.056          Steady     1           up to 10
//! < 0.89           Slowly     2           10-160
//! < 2              Changing   3           160-360
//! < 3.33           Quickly    4           360-600
//! < 9999           Rapidly    5           above 600
//! ```
//!
//! Ties between the windows go to the one-hour result: with equal
//! severity the fresher signal is the better forecast.

use crate::config::Config;
use crate::reading::Reading;
use crate::store::ReadingStore;
use crate::time::TimeSource;

/// Short analysis window, minutes.
pub const ONE_HOUR_MINUTES: u32 = 60;

/// Long analysis window, minutes.
pub const THREE_HOURS_MINUTES: u32 = 180;

/// Direction of the pressure change. A flat window counts as rising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tendency {
    /// Pressure unchanged or increasing over the window.
    Rising,
    /// Pressure decreasing over the window.
    Falling,
}

impl Tendency {
    /// Stable uppercase key for serialization and display.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Rising => "RISING",
            Self::Falling => "FALLING",
        }
    }
}

/// Magnitude class of the pressure change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Trend {
    /// Below 0.056 Pa/min.
    Steady,
    /// Below 0.89 Pa/min.
    Slowly,
    /// Below 2 Pa/min.
    Changing,
    /// Below 3.33 Pa/min.
    Quickly,
    /// Everything faster.
    Rapidly,
}

impl Trend {
    /// Severity rank, 1 (Steady) through 5 (Rapidly).
    pub fn severity(&self) -> u8 {
        match self {
            Self::Steady => 1,
            Self::Slowly => 2,
            Self::Changing => 3,
            Self::Quickly => 4,
            Self::Rapidly => 5,
        }
    }

    /// Stable uppercase key for serialization and display.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Steady => "STEADY",
            Self::Slowly => "SLOWLY",
            Self::Changing => "CHANGING",
            Self::Quickly => "QUICKLY",
            Self::Rapidly => "RAPIDLY",
        }
    }
}

/// Ratio ladder, Pa per minute. Classification takes the first rung the
/// absolute ratio falls under.
const THRESHOLDS: [(f32, Trend); 5] = [
    (0.056, Trend::Steady),
    (0.89, Trend::Slowly),
    (2.0, Trend::Changing),
    (3.33, Trend::Quickly),
    (9999.0, Trend::Rapidly),
];

fn classify(ratio_abs: f32) -> Trend {
    for (threshold, trend) in THRESHOLDS {
        if ratio_abs < threshold {
            return trend;
        }
    }
    Trend::Rapidly
}

/// Trend over a single window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendForecast {
    /// Direction of the change.
    pub tendency: Tendency,
    /// Magnitude class of the change.
    pub trend: Trend,
    /// Earliest reading of the window.
    pub from: Reading,
    /// Latest reading of the window.
    pub to: Reading,
    /// Signed pressure change over the window, Pa.
    pub difference: f32,
    /// Absolute rate of change, Pa per minute of the nominal window.
    pub ratio: f32,
    /// Nominal window length in minutes.
    pub period: u32,
}

/// Classify the trend across one window's readings.
///
/// `readings` must already be limited to the window and sorted ascending;
/// the ratio divides by the nominal window length, not the actual span.
/// Returns `None` for fewer than two readings.
pub fn over_window(
    readings: &[Reading],
    window_minutes: u32,
    config: &Config,
) -> Option<TrendForecast> {
    if readings.len() < 2 {
        return None;
    }

    let from = readings[0];
    let to = readings[readings.len() - 1];
    let difference = to.effective_pressure(config) - from.effective_pressure(config);
    let ratio = (difference / window_minutes as f32).abs();

    let tendency = if difference >= 0.0 {
        Tendency::Rising
    } else {
        Tendency::Falling
    };

    Some(TrendForecast {
        tendency,
        trend: classify(ratio),
        from,
        to,
        difference,
        ratio,
        period: window_minutes,
    })
}

/// Classify the current trend from the store's trailing readings.
///
/// Both windows are evaluated; the one with the higher severity wins and
/// ties go to the one-hour window. Returns `None` when even the three-hour
/// window has fewer than two readings.
pub fn forecast<C: TimeSource>(store: &ReadingStore<C>) -> Option<TrendForecast> {
    let config = store.config();
    let three = over_window(
        &store.readings_since(THREE_HOURS_MINUTES),
        THREE_HOURS_MINUTES,
        config,
    )?;
    let one = over_window(
        &store.readings_since(ONE_HOUR_MINUTES),
        ONE_HOUR_MINUTES,
        config,
    );

    match one {
        Some(one) if one.trend.severity() >= three.trend.severity() => Some(one),
        _ => Some(three),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{Calculated, ReadingMeta, to_kelvin};
    use crate::time::{MS_PER_MINUTE, Timestamp};

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
    fn small_rise_is_steady() {
        let readings = [reading(0, 101_320.0), reading(179, 101_325.0)];
        let result = over_window(&readings, THREE_HOURS_MINUTES, &Config::default()).unwrap();

        assert_eq!(result.tendency, Tendency::Rising);
        assert_eq!(result.trend, Trend::Steady);
        assert_eq!(result.difference, 5.0);
        assert_eq!(result.period, 180);
    }

    #[test]
    fn fast_fall_is_rapid() {
        let readings = [reading(0, 101_500.0), reading(59, 101_050.0)];
        let result = over_window(&readings, ONE_HOUR_MINUTES, &Config::default()).unwrap();

        assert_eq!(result.tendency, Tendency::Falling);
        assert_eq!(result.trend, Trend::Rapidly);
        assert_eq!(result.difference, -450.0);
    }

    #[test]
    fn ladder_rungs() {
        assert_eq!(classify(0.0), Trend::Steady);
        assert_eq!(classify(0.5), Trend::Slowly);
        assert_eq!(classify(1.5), Trend::Changing);
        assert_eq!(classify(3.0), Trend::Quickly);
        assert_eq!(classify(10.0), Trend::Rapidly);
        assert_eq!(classify(20_000.0), Trend::Rapidly);
    }

    #[test]
    fn symmetric_changes_share_the_class() {
        let rising = [reading(0, 101_200.0), reading(180, 101_500.0)];
        let falling = [reading(0, 101_500.0), reading(180, 101_200.0)];
        let config = Config::default();

        let up = over_window(&rising, THREE_HOURS_MINUTES, &config).unwrap();
        let down = over_window(&falling, THREE_HOURS_MINUTES, &config).unwrap();

        assert_eq!(up.trend, down.trend);
        assert_eq!(up.ratio, down.ratio);
        assert_eq!(up.tendency, Tendency::Rising);
        assert_eq!(down.tendency, Tendency::Falling);
    }

    #[test]
    fn flat_window_counts_as_rising() {
        let readings = [reading(0, 101_325.0), reading(60, 101_325.0)];
        let result = over_window(&readings, ONE_HOUR_MINUTES, &Config::default()).unwrap();
        assert_eq!(result.tendency, Tendency::Rising);
        assert_eq!(result.trend, Trend::Steady);
    }

    #[test]
    fn too_few_readings() {
        let config = Config::default();
        assert!(over_window(&[], ONE_HOUR_MINUTES, &config).is_none());
        assert!(over_window(&[reading(0, 101_325.0)], ONE_HOUR_MINUTES, &config).is_none());
    }

    #[test]
    fn severity_ranks_ordered() {
        assert!(Trend::Steady.severity() < Trend::Slowly.severity());
        assert!(Trend::Quickly.severity() < Trend::Rapidly.severity());
        assert_eq!(Trend::Rapidly.key(), "RAPIDLY");
        assert_eq!(Tendency::Falling.key(), "FALLING");
    }
}
