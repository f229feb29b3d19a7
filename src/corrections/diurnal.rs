//! Diurnal-Rhythm Pressure Correction
//!
//! ## Physics Background
//!
//! Solar heating drives a semi-diurnal oscillation of surface pressure
//! (the atmospheric tide): two maxima and two minima per day, strongest in
//! the tropics (several hPa) and nearly absent near the poles. A barometer
//! watching for weather systems sees this oscillation as a false trend, so
//! it is removed before the series feeds the analyzers.
//!
//! ## Model
//!
//! The model buckets latitude into five bands, each with a base amplitude
//! (Pa) and the local solar hours at which the oscillation peaks:
//!
//! ```text
//! Band               |lat|      Amplitude   Peak hours
//! ----------------------------------------------------
//! Tropics            < 23.5°    350 Pa      4, 10, 16, 22
//! Subtropics         < 30°      250 Pa      5, 11, 17, 23
//! Mid-latitudes      < 60°      150 Pa      6, 12, 18, 0
//! High mid-latitudes < 70°      100 Pa      7, 13, 19, 1
//! Polar              ≤ 90°       50 Pa      8, 14, 20, 2
//! ```
//!
//! The amplitude is scaled by a seasonal factor derived from the solar
//! declination (day-of-year and latitude), clamped to [0.8, 1.2]. The
//! correction at a given hour is the scaled amplitude times a cosine of
//! the signed hours from the nearest peak over the 24-hour cycle, with the
//! sign of the offset carried through (a reading exactly on a peak gets no
//! correction). The correction is subtracted from the observed pressure;
//! a weather-system anomaly - selected by the corrected value's
//! Low/Normal/High class and the latitude band, scaled by the deviation
//! from standard pressure - is added back so that genuine synoptic
//! signals survive the detrending.
//!
//! Historical formulations of this correction diverged on peak-hour sets
//! and anomaly magnitude; this module pins one formulation (the one
//! described above) rather than reconciling the variants.

use chrono::{DateTime, Datelike, Timelike};

use crate::analysis::system::{self, PressureSystem, STANDARD_PRESSURE_PA};
use crate::errors::{ValidationError, ValidationResult};
use crate::reading::is_valid_latitude;
use crate::time::Timestamp;

/// Fraction of the pressure deviation from standard folded into the
/// weather-system anomaly.
const ANOMALY_DEVIATION_GAIN: f64 = 0.1;

/// One latitude band of the semi-diurnal oscillation model.
struct LatitudeBand {
    /// Upper bound on |latitude| for this band, degrees.
    max_abs_latitude: f32,
    /// Oscillation amplitude before seasonal scaling, Pa.
    base_amplitude: f64,
    /// Local solar hours of the oscillation peaks.
    peak_hours: [i32; 4],
    /// Anomaly added back under a high-pressure system, Pa.
    anomaly_high: f64,
    /// Anomaly added back under a low-pressure system, Pa.
    anomaly_low: f64,
    /// Anomaly added back under a normal system, Pa.
    anomaly_normal: f64,
}

const BANDS: [LatitudeBand; 5] = [
    LatitudeBand {
        max_abs_latitude: 23.5,
        base_amplitude: 350.0,
        peak_hours: [4, 10, 16, 22],
        anomaly_high: 300.0,
        anomaly_low: -200.0,
        anomaly_normal: 50.0,
    },
    LatitudeBand {
        max_abs_latitude: 30.0,
        base_amplitude: 250.0,
        peak_hours: [5, 11, 17, 23],
        anomaly_high: 400.0,
        anomaly_low: -300.0,
        anomaly_normal: 50.0,
    },
    LatitudeBand {
        max_abs_latitude: 60.0,
        base_amplitude: 150.0,
        peak_hours: [6, 12, 18, 0],
        anomaly_high: 500.0,
        anomaly_low: -400.0,
        anomaly_normal: 50.0,
    },
    LatitudeBand {
        max_abs_latitude: 70.0,
        base_amplitude: 100.0,
        peak_hours: [7, 13, 19, 1],
        anomaly_high: 600.0,
        anomaly_low: -500.0,
        anomaly_normal: 50.0,
    },
    LatitudeBand {
        max_abs_latitude: 90.0,
        base_amplitude: 50.0,
        peak_hours: [8, 14, 20, 2],
        anomaly_high: 700.0,
        anomaly_low: -600.0,
        anomaly_normal: 50.0,
    },
];

/// Result of the diurnal-rhythm correction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiurnalCorrection {
    /// Corrected pressure, rounded to the nearest pascal.
    pub corrected_pressure: f32,
    /// Oscillation correction that was subtracted, Pa.
    pub correction: f32,
    /// Weather-system anomaly that was added back, Pa.
    pub anomaly: f32,
    /// Seasonal amplitude scale that was applied, in [0.8, 1.2].
    pub seasonal_factor: f32,
}

fn band_for(abs_latitude: f32) -> &'static LatitudeBand {
    BANDS
        .iter()
        .find(|band| abs_latitude < band.max_abs_latitude)
        .unwrap_or(&BANDS[4])
}

/// Solar declination in radians for a day of the year (1-366).
fn solar_declination(day_of_year: i32) -> f64 {
    // Earth's axial tilt
    let epsilon = 23.44_f64.to_radians();
    // Orbital angle relative to the March equinox (~day 81)
    let omega = core::f64::consts::TAU / 365.0 * (day_of_year as f64 - 81.0);
    epsilon * libm::sin(omega)
}

/// Seasonal amplitude scale for a day of the year and latitude,
/// clamped to [0.8, 1.2].
fn seasonal_factor(day_of_year: i32, latitude: f64) -> f64 {
    let declination = solar_declination(day_of_year);
    let angle = libm::asin(libm::sin(latitude.to_radians()) * libm::sin(declination));
    (1.0 + 0.25 * libm::sin(angle)).clamp(0.8, 1.2)
}

/// Signed hours from `hour` back to `peak`, normalized to [-12, 12].
fn signed_hours_from_peak(hour: i32, peak: i32) -> i32 {
    let raw = (hour - peak).rem_euclid(24);
    if raw > 12 {
        raw - 24
    } else {
        raw
    }
}

fn closest_peak(hour: i32, peaks: &[i32; 4]) -> i32 {
    let mut closest = peaks[0];
    for &peak in &peaks[1..] {
        if signed_hours_from_peak(hour, peak).abs()
            < signed_hours_from_peak(hour, closest).abs()
        {
            closest = peak;
        }
    }
    closest
}

/// Correct an observed pressure for the semi-diurnal oscillation.
///
/// # Errors
///
/// - [`ValidationError::OutOfRange`] when `pressure_pa` is not positive
/// - [`ValidationError::InvalidLatitude`] when `latitude` is outside
///   [-90, 90]
/// - [`ValidationError::InvalidValue`] when inputs are non-finite or the
///   timestamp cannot be interpreted as a calendar instant
pub fn correct_pressure(
    pressure_pa: f32,
    latitude: f32,
    timestamp: Timestamp,
) -> ValidationResult<DiurnalCorrection> {
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
    if !is_valid_latitude(latitude) {
        return Err(ValidationError::InvalidLatitude { latitude });
    }

    let instant = DateTime::from_timestamp_millis(timestamp as i64)
        .ok_or(ValidationError::InvalidValue)?;
    let hour = instant.hour() as i32;
    let day_of_year = instant.ordinal() as i32;

    let band = band_for(latitude.abs());
    let seasonal = seasonal_factor(day_of_year, latitude as f64);
    let amplitude = band.base_amplitude * seasonal;

    let peak = closest_peak(hour, &band.peak_hours);
    let signed = signed_hours_from_peak(hour, peak);
    let phase = core::f64::consts::TAU / 24.0 * signed as f64;
    let correction = amplitude * libm::cos(phase) * signed.signum() as f64;

    let observed = pressure_pa as f64;
    let detrended = (observed - correction) as f32;
    let base_anomaly = match system::by_pressure(detrended) {
        PressureSystem::High => band.anomaly_high,
        PressureSystem::Low => band.anomaly_low,
        PressureSystem::Normal => band.anomaly_normal,
    };
    let anomaly =
        base_anomaly + ANOMALY_DEVIATION_GAIN * (observed - STANDARD_PRESSURE_PA as f64);

    let corrected = libm::round(observed - correction + anomaly) as f32;

    Ok(DiurnalCorrection {
        corrected_pressure: corrected,
        correction: correction as f32,
        anomaly: anomaly as f32,
        seasonal_factor: seasonal as f32,
    })
}
