//! Time-Ordered Reading Store
//!
//! The store owns the reading series every analyzer works from. A reading
//! passes through the full correction pipeline exactly once, at ingest:
//! metadata is resolved, the sea-level and diurnal variants are computed
//! and frozen, and (when enabled) the smoothing delta against the trailing
//! hour is recorded. After that the series is append-only until retention
//! pruning or [`ReadingStore::clear`] removes readings.
//!
//! Invariants the store maintains across every operation:
//!
//! - readings are sorted ascending by timestamp;
//! - timestamps are unique (an exact duplicate is silently dropped);
//! - nothing older than the retention window survives an insert, unless
//!   the test-only retain flag is set.
//!
//! The clock is injected through [`TimeSource`] so the trailing-window
//! queries and retention can be driven deterministically in tests.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::config::Config;
use crate::corrections::{diurnal, sea_level, smoothing};
use crate::errors::{ValidationError, ValidationResult};
use crate::reading::{Calculated, Reading, SensorMeta};
#[cfg(feature = "std")]
use crate::time::SystemClock;
use crate::time::{minutes_before, TimeSource, Timestamp, MS_PER_MINUTE};

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// Number of 30-minute buckets the data-quality score inspects.
const QUALITY_BUCKETS: u32 = 6;

/// Minutes of the trailing window the smoothing screen looks at.
const SMOOTHING_WINDOW_MINUTES: u32 = 60;

/// Time-ordered store of corrected pressure readings.
pub struct ReadingStore<C: TimeSource> {
    config: Config,
    readings: Vec<Reading>,
    clock: C,
    observers: Vec<Box<dyn FnMut(&Reading)>>,
}

#[cfg(feature = "std")]
impl ReadingStore<SystemClock> {
    /// Create a store driven by the system wall clock.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: TimeSource> ReadingStore<C> {
    /// Create a store with an explicit time source.
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self {
            config,
            readings: Vec::new(),
            clock,
            observers: Vec::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration; the next operation sees the change.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Mutable access to the injected clock (test support).
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Add a pressure reading, running the full correction pipeline.
    ///
    /// A missing timestamp defaults to "now". A reading older than the
    /// retention window, or one duplicating an existing timestamp, is
    /// silently dropped and `Ok(None)` returned. Validation failures in
    /// the pressure, metadata or corrections are errors.
    pub fn add(
        &mut self,
        timestamp: Option<Timestamp>,
        pressure_pa: f32,
        meta: SensorMeta,
    ) -> Result<Option<Reading>, ValidationError> {
        if !pressure_pa.is_finite() {
            return Err(ValidationError::InvalidValue);
        }
        if pressure_pa <= 0.0 {
            return Err(ValidationError::OutOfRange {
                value: pressure_pa,
                min: 0.0,
                max: f32::MAX,
            });
        }

        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());

        if !self.config.retain_all_for_testing {
            let cutoff = minutes_before(self.clock.now(), self.config.retention_minutes);
            if timestamp < cutoff {
                log_debug!("dropping reading at {} older than retention", timestamp);
                return Ok(None);
            }
        }
        if self.readings.iter().any(|r| r.timestamp == timestamp) {
            log_debug!("dropping duplicate reading at {}", timestamp);
            return Ok(None);
        }

        let resolved = meta.resolve(&self.config)?;
        let pressure_asl =
            sea_level::adjust_to_sea_level(pressure_pa, resolved.altitude, resolved.temperature)?;

        let (diurnal_pressure, diurnal_pressure_asl) = match resolved.latitude {
            Some(latitude) => {
                let raw = diurnal::correct_pressure(pressure_pa, latitude, timestamp)?;
                let asl = diurnal::correct_pressure(pressure_asl, latitude, timestamp)?;
                (raw.corrected_pressure, asl.corrected_pressure)
            }
            None => (pressure_pa, pressure_asl),
        };

        let smoothing_delta = if self.config.apply_smoothing {
            self.smoothing_delta_for(timestamp, pressure_pa)
        } else {
            0.0
        };

        let reading = Reading {
            timestamp,
            raw_pressure: pressure_pa,
            meta: resolved,
            calculated: Calculated {
                pressure_asl,
                diurnal_pressure,
                diurnal_pressure_asl,
                smoothing_delta,
            },
        };

        self.readings.push(reading);
        self.readings.sort_unstable_by_key(|r| r.timestamp);
        self.prune();

        for observer in &mut self.observers {
            observer(&reading);
        }

        Ok(Some(reading))
    }

    /// Register a callback invoked after every stored reading.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&Reading) + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Delta smoothing would apply to a candidate against the trailing
    /// hour of stored readings. Zero until enough history exists.
    fn smoothing_delta_for(&self, timestamp: Timestamp, pressure_pa: f32) -> f32 {
        let window_start = minutes_before(timestamp, SMOOTHING_WINDOW_MINUTES);
        let mut series: Vec<f32> = self
            .readings
            .iter()
            .filter(|r| r.timestamp >= window_start && r.timestamp <= timestamp)
            .map(|r| r.raw_pressure)
            .collect();

        if series.len() <= smoothing::MIN_TRAILING_READINGS {
            return 0.0;
        }

        series.push(pressure_pa);
        let (_, delta) = smoothing::smooth_latest(
            &series,
            self.config.smoothing_sigma,
            self.config.smoothing_alpha,
        );
        delta
    }

    fn prune(&mut self) {
        if self.config.retain_all_for_testing {
            return;
        }
        let cutoff = minutes_before(self.clock.now(), self.config.retention_minutes);
        let before = self.readings.len();
        self.readings.retain(|r| r.timestamp >= cutoff);
        if self.readings.len() < before {
            log_debug!("pruned {} readings past retention", before - self.readings.len());
        }
    }

    /// Latest reading by timestamp.
    pub fn latest_reading(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Oldest retained reading.
    pub fn first_reading(&self) -> Option<&Reading> {
        self.readings.first()
    }

    /// All retained readings, sorted ascending by timestamp.
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    /// Whether any readings are retained.
    pub fn has_readings(&self) -> bool {
        !self.readings.is_empty()
    }

    /// Number of retained readings.
    pub fn count(&self) -> usize {
        self.readings.len()
    }

    /// True when no readings are retained.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Remove every reading. Configuration and observers survive.
    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Readings with timestamps in `[start, end]`, both inclusive.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidPeriod`] when `start > end`.
    pub fn readings_between(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> ValidationResult<Vec<Reading>> {
        if start > end {
            return Err(ValidationError::InvalidPeriod { start, end });
        }
        Ok(self
            .readings
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .copied()
            .collect())
    }

    /// Readings from the trailing `minutes` up to now.
    pub fn readings_since(&self, minutes: u32) -> Vec<Reading> {
        let cutoff = minutes_before(self.clock.now(), minutes);
        self.readings
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .copied()
            .collect()
    }

    /// The reading closest in time to `timestamp`; the earlier reading
    /// wins an exact distance tie.
    pub fn closest_to(&self, timestamp: Timestamp) -> Option<Reading> {
        let before = self.readings.iter().rev().find(|r| r.timestamp <= timestamp);
        let after = self.readings.iter().find(|r| r.timestamp > timestamp);

        match (before, after) {
            (Some(b), Some(a)) => {
                if timestamp - b.timestamp <= a.timestamp - timestamp {
                    Some(*b)
                } else {
                    Some(*a)
                }
            }
            (Some(b), None) => Some(*b),
            (None, Some(a)) => Some(*a),
            (None, None) => None,
        }
    }

    /// Pressure variant the configuration selects, for `reading` or the
    /// latest one. `None` on an empty store.
    pub fn pressure_by_default_choice(&self, reading: Option<&Reading>) -> Option<f32> {
        reading
            .or_else(|| self.latest_reading())
            .map(|r| r.pressure_by_choice(&self.config))
    }

    /// Pressure the analyzers consume for `reading` under the current
    /// configuration.
    pub fn effective_pressure(&self, reading: &Reading) -> f32 {
        reading.effective_pressure(&self.config)
    }

    /// Coverage of the trailing three hours as a rounded percentage of
    /// 30-minute buckets containing at least one reading.
    pub fn data_quality(&self) -> u8 {
        let now = self.clock.now();
        let mut occupied = 0u32;

        for i in 0..QUALITY_BUCKETS {
            let end = minutes_before(now, i * 30);
            let start = minutes_before(now, (i + 1) * 30);
            if self
                .readings
                .iter()
                .any(|r| r.timestamp > start && r.timestamp <= end)
            {
                occupied += 1;
            }
        }

        libm::roundf(occupied as f32 / QUALITY_BUCKETS as f32 * 100.0) as u8
    }

    /// The reading closest to each of the last `limit` hour marks,
    /// oldest-hour last. `None` for hours where the closest reading lies
    /// 30 minutes or more past the mark.
    pub fn hourly_history(&self, limit: u32) -> Vec<Option<Reading>> {
        let now = self.clock.now();
        (1..=limit)
            .map(|hour| {
                let threshold = minutes_before(now, hour * 60);
                self.closest_to(threshold).filter(|r| {
                    (r.timestamp as i64 - threshold as i64) < 30 * MS_PER_MINUTE as i64
                })
            })
            .collect()
    }

    /// Mean effective pressure over the trailing `minutes`, rounded to
    /// the nearest pascal. `None` without readings in the window.
    pub fn average_pressure_since(&self, minutes: u32) -> Option<f32> {
        let readings = self.readings_since(minutes);
        if readings.is_empty() {
            return None;
        }
        let sum: f64 = readings
            .iter()
            .map(|r| self.effective_pressure(r) as f64)
            .sum();
        Some(libm::round(sum / readings.len() as f64) as f32)
    }
}
