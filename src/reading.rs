//! Reading types and ingest-time normalization
//!
//! A [`Reading`] is one barometer observation: the raw pressure, resolved
//! metadata and the derived values computed by the correction pipeline at
//! the moment it was added. Derived values are frozen at ingest; they are
//! never recomputed when configuration changes later.
//!
//! Callers hand in a [`SensorMeta`] with all-optional fields; the single
//! [`SensorMeta::resolve`] step fills defaults and validates, so no other
//! code path needs to reason about missing metadata.

use crate::config::Config;
use crate::errors::{ValidationError, ValidationResult};
use crate::time::Timestamp;

/// Celsius-to-Kelvin offset.
pub const KELVIN_OFFSET: f32 = 273.15;

/// Convert a Celsius temperature to Kelvin.
pub fn to_kelvin(celsius: f32) -> f32 {
    celsius + KELVIN_OFFSET
}

/// Check that a latitude is a finite decimal degree within [-90, 90].
pub fn is_valid_latitude(latitude: f32) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

/// Optional metadata supplied alongside a raw pressure at ingest.
///
/// Every field may be absent; defaults are resolved in one place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorMeta {
    /// Altitude above sea level in meters. Defaults to 0.
    pub altitude: Option<f32>,
    /// Air temperature in Kelvin. Defaults to the configured mean
    /// sea-level temperature.
    pub temperature: Option<f32>,
    /// Relative humidity in percent (0-100).
    pub humidity: Option<f32>,
    /// True wind direction in degrees, 0-359. 360 normalizes to 0.
    pub wind_direction: Option<f32>,
    /// True wind speed, unit chosen by the caller.
    pub wind_speed: Option<f32>,
    /// Latitude in decimal degrees. Values outside [-90, 90] are treated
    /// as absent.
    pub latitude: Option<f32>,
}

impl SensorMeta {
    /// Metadata carrying only an altitude.
    pub fn at_altitude(altitude: f32) -> Self {
        Self {
            altitude: Some(altitude),
            ..Self::default()
        }
    }

    /// Metadata carrying only a latitude.
    pub fn at_latitude(latitude: f32) -> Self {
        Self {
            latitude: Some(latitude),
            ..Self::default()
        }
    }

    /// Set the temperature in Kelvin.
    pub fn with_temperature(mut self, kelvin: f32) -> Self {
        self.temperature = Some(kelvin);
        self
    }

    /// Set the latitude in decimal degrees.
    pub fn with_latitude(mut self, latitude: f32) -> Self {
        self.latitude = Some(latitude);
        self
    }

    /// Set the true wind direction in degrees.
    pub fn with_wind_direction(mut self, degrees: f32) -> Self {
        self.wind_direction = Some(degrees);
        self
    }

    /// Fill defaults and validate, producing resolved metadata.
    ///
    /// Altitude defaults to 0 and must be finite and non-negative.
    /// Temperature defaults to the configured mean sea-level temperature
    /// (converted to Kelvin) and must be finite and positive. A wind
    /// direction of 360 normalizes to 0. An out-of-range latitude is
    /// dropped rather than rejected; the diurnal correction simply won't
    /// run for that reading.
    pub fn resolve(&self, config: &Config) -> ValidationResult<ReadingMeta> {
        let altitude = self.altitude.unwrap_or(0.0);
        if !altitude.is_finite() {
            return Err(ValidationError::InvalidValue);
        }
        if altitude < 0.0 {
            return Err(ValidationError::OutOfRange {
                value: altitude,
                min: 0.0,
                max: f32::MAX,
            });
        }

        let temperature = self
            .temperature
            .unwrap_or_else(|| to_kelvin(config.mean_sea_level_temperature));
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ValidationError::InvalidValue);
        }

        if let Some(humidity) = self.humidity {
            if !humidity.is_finite() || !(0.0..=100.0).contains(&humidity) {
                return Err(ValidationError::OutOfRange {
                    value: humidity,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }

        let wind_direction = match self.wind_direction {
            Some(degrees) if !degrees.is_finite() => {
                return Err(ValidationError::InvalidValue)
            }
            Some(degrees) if !(0.0..=360.0).contains(&degrees) => {
                return Err(ValidationError::OutOfRange {
                    value: degrees,
                    min: 0.0,
                    max: 360.0,
                })
            }
            Some(degrees) if degrees == 360.0 => Some(0.0),
            other => other,
        };

        if let Some(speed) = self.wind_speed {
            if !speed.is_finite() || speed < 0.0 {
                return Err(ValidationError::InvalidValue);
            }
        }

        let latitude = self.latitude.filter(|lat| is_valid_latitude(*lat));

        Ok(ReadingMeta {
            altitude,
            temperature,
            humidity: self.humidity,
            wind_direction,
            wind_speed: self.wind_speed,
            latitude,
        })
    }
}

/// Resolved metadata stored with a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadingMeta {
    /// Altitude above sea level in meters.
    pub altitude: f32,
    /// Air temperature in Kelvin.
    pub temperature: f32,
    /// Relative humidity in percent, when supplied.
    pub humidity: Option<f32>,
    /// True wind direction in degrees 0-359, when supplied.
    pub wind_direction: Option<f32>,
    /// True wind speed, when supplied.
    pub wind_speed: Option<f32>,
    /// Latitude in decimal degrees, when supplied and valid.
    pub latitude: Option<f32>,
}

impl ReadingMeta {
    /// Hemisphere of the observation. Defaults to northern when the
    /// latitude is unknown.
    pub fn is_northern_hemisphere(&self) -> bool {
        match self.latitude {
            Some(latitude) => latitude > 0.0,
            None => true,
        }
    }
}

/// Values derived by the correction pipeline at ingest.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calculated {
    /// Sea-level-adjusted pressure in pascals.
    pub pressure_asl: f32,
    /// Diurnal-rhythm-corrected pressure; the raw pressure when no valid
    /// latitude was available.
    pub diurnal_pressure: f32,
    /// Diurnal-corrected sea-level-adjusted pressure; `pressure_asl` when
    /// no valid latitude was available.
    pub diurnal_pressure_asl: f32,
    /// Delta applied by outlier smoothing; 0 when smoothing was disabled
    /// or history was insufficient.
    pub smoothing_delta: f32,
}

/// One barometer observation with its derived values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reading {
    /// Observation time in milliseconds since the Unix epoch. Unique
    /// within a store.
    pub timestamp: Timestamp,
    /// Pressure as reported by the sensor, in pascals.
    pub raw_pressure: f32,
    /// Resolved metadata.
    pub meta: ReadingMeta,
    /// Derived values, frozen at ingest.
    pub calculated: Calculated,
}

impl Reading {
    /// Pressure variant selected by the configuration's default choice.
    ///
    /// The sea-level family applies when the reading was taken above sea
    /// level or `prefer_sea_level` is set; within the chosen family,
    /// `apply_diurnal` picks the diurnal-corrected variant.
    pub fn pressure_by_choice(&self, config: &Config) -> f32 {
        let use_sea_level = config.prefer_sea_level || self.meta.altitude > 0.0;
        match (use_sea_level, config.apply_diurnal) {
            (true, true) => self.calculated.diurnal_pressure_asl,
            (true, false) => self.calculated.pressure_asl,
            (false, true) => self.calculated.diurnal_pressure,
            (false, false) => self.raw_pressure,
        }
    }

    /// Pressure the analyzers consume: the default choice, with the
    /// smoothing delta folded in when smoothing is active.
    pub fn effective_pressure(&self, config: &Config) -> f32 {
        let delta = if config.apply_smoothing {
            self.calculated.smoothing_delta
        } else {
            0.0
        };
        self.pressure_by_choice(config) + delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(raw: f32) -> Reading {
        Reading {
            timestamp: 0,
            raw_pressure: raw,
            meta: ReadingMeta {
                altitude: 0.0,
                temperature: to_kelvin(15.0),
                humidity: None,
                wind_direction: None,
                wind_speed: None,
                latitude: None,
            },
            calculated: Calculated {
                pressure_asl: raw + 1.0,
                diurnal_pressure: raw + 2.0,
                diurnal_pressure_asl: raw + 3.0,
                smoothing_delta: -5.0,
            },
        }
    }

    #[test]
    fn latitude_bounds() {
        assert!(is_valid_latitude(45.123));
        assert!(is_valid_latitude(-90.0));
        assert!(is_valid_latitude(90.0));
        assert!(!is_valid_latitude(90.01));
        assert!(!is_valid_latitude(-90.01));
        assert!(!is_valid_latitude(f32::NAN));
    }

    #[test]
    fn resolve_fills_defaults() {
        let meta = SensorMeta::default().resolve(&Config::default()).unwrap();
        assert_eq!(meta.altitude, 0.0);
        assert_eq!(meta.temperature, to_kelvin(15.0));
        assert!(meta.latitude.is_none());
    }

    #[test]
    fn resolve_normalizes_wind_direction() {
        let meta = SensorMeta::default()
            .with_wind_direction(360.0)
            .resolve(&Config::default())
            .unwrap();
        assert_eq!(meta.wind_direction, Some(0.0));

        let err = SensorMeta::default()
            .with_wind_direction(361.0)
            .resolve(&Config::default());
        assert!(err.is_err());
    }

    #[test]
    fn resolve_drops_invalid_latitude() {
        let meta = SensorMeta::default()
            .with_latitude(91.0)
            .resolve(&Config::default())
            .unwrap();
        assert!(meta.latitude.is_none());
    }

    #[test]
    fn resolve_rejects_negative_altitude() {
        let err = SensorMeta::at_altitude(-10.0).resolve(&Config::default());
        assert!(matches!(err, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn default_choice_follows_flags() {
        let r = reading(101_325.0);
        let mut config = Config::default();
        assert_eq!(r.pressure_by_choice(&config), 101_325.0);

        config.prefer_sea_level = true;
        assert_eq!(r.pressure_by_choice(&config), 101_326.0);

        config.apply_diurnal = true;
        assert_eq!(r.pressure_by_choice(&config), 101_328.0);

        config.prefer_sea_level = false;
        assert_eq!(r.pressure_by_choice(&config), 101_327.0);
    }

    #[test]
    fn altitude_forces_sea_level_family() {
        let mut r = reading(98_000.0);
        r.meta.altitude = 100.0;
        assert_eq!(r.pressure_by_choice(&Config::default()), 98_001.0);
    }

    #[test]
    fn effective_pressure_adds_smoothing_delta() {
        let r = reading(101_325.0);
        let mut config = Config::default();
        assert_eq!(r.effective_pressure(&config), 101_325.0);

        config.apply_smoothing = true;
        assert_eq!(r.effective_pressure(&config), 101_320.0);
    }

    #[test]
    fn hemisphere_defaults_north() {
        let meta = SensorMeta::default().resolve(&Config::default()).unwrap();
        assert!(meta.is_northern_hemisphere());

        let south = SensorMeta::at_latitude(-1.123)
            .resolve(&Config::default())
            .unwrap();
        assert!(!south.is_northern_hemisphere());
    }
}
