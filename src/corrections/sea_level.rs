//! Sea-Level Pressure Adjustment
//!
//! ## Physics Background
//!
//! A barometer at altitude reads lower than one at sea level because less
//! atmosphere weighs down on it - roughly 12 hPa per 100 m near the
//! surface. To compare stations (or feed weather heuristics calibrated for
//! sea level) the reading is scaled back up with the international
//! barometric formula:
//!
//! ```text
//! P₀ = P × (1 − 0.0065·h / (T_C + 0.0065·h + 273.15))^(−5.257)
//!
//! Where:
//! - P₀  = equivalent sea-level pressure (Pa)
//! - P   = observed pressure (Pa)
//! - h   = altitude above sea level (m)
//! - T_C = air temperature (°C)
//! - 0.0065 = standard temperature lapse rate (K/m)
//! ```
//!
//! The result is rounded to the nearest pascal - barometer feeds do not
//! resolve fractions of a pascal, and integral values keep downstream
//! comparisons stable.
//!
//! The computation runs in `f64` through `libm` so results are identical
//! with and without `std` and independent of the target's FPU.

use crate::errors::{ValidationError, ValidationResult};
use crate::reading::KELVIN_OFFSET;

/// Standard temperature lapse rate in the troposphere (K/m).
const TEMP_LAPSE_K_PER_M: f64 = 0.0065;

/// Barometric-formula exponent for the standard atmosphere.
const BAROMETRIC_EXPONENT: f64 = -5.257;

/// Adjust an observed pressure to its sea-level equivalent.
///
/// Identity at altitude 0: the observed pressure is returned unchanged.
///
/// # Errors
///
/// - [`ValidationError::InvalidValue`] for non-finite inputs or a
///   non-positive Kelvin temperature
/// - [`ValidationError::OutOfRange`] for a non-positive pressure or a
///   negative altitude
pub fn adjust_to_sea_level(
    pressure_pa: f32,
    altitude_m: f32,
    temperature_k: f32,
) -> ValidationResult<f32> {
    if !pressure_pa.is_finite() || !altitude_m.is_finite() || !temperature_k.is_finite() {
        return Err(ValidationError::InvalidValue);
    }
    if pressure_pa <= 0.0 {
        return Err(ValidationError::OutOfRange {
            value: pressure_pa,
            min: 0.0,
            max: f32::MAX,
        });
    }
    if altitude_m < 0.0 {
        return Err(ValidationError::OutOfRange {
            value: altitude_m,
            min: 0.0,
            max: f32::MAX,
        });
    }
    if temperature_k <= 0.0 {
        return Err(ValidationError::InvalidValue);
    }

    if altitude_m == 0.0 {
        return Ok(pressure_pa);
    }

    let pressure = pressure_pa as f64;
    let altitude = altitude_m as f64;
    let temp_celsius = temperature_k as f64 - KELVIN_OFFSET as f64;

    let lapse_term = TEMP_LAPSE_K_PER_M * altitude;
    let ratio = 1.0 - lapse_term / (temp_celsius + lapse_term + KELVIN_OFFSET as f64);
    let sea_level = pressure * libm::pow(ratio, BAROMETRIC_EXPONENT);

    Ok(libm::round(sea_level) as f32)
}
