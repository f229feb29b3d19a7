//! Error types for ingest and correction failures
//!
//! The error surface is deliberately small. Only genuinely bad input is an
//! error: non-finite or non-positive pressures, impossible latitudes,
//! inverted query periods. Everything else that can "fail" is a normal
//! state of a young series — an empty store, a window with one reading, a
//! regression with no solution — and is expressed as `Option::None` by the
//! queries and analyzers, never as an `Err`.
//!
//! Duplicate-timestamp inserts and inserts older than the retention window
//! are a third category: expected sensor jitter and replay. Those are
//! dropped silently by [`ReadingStore::add`](crate::store::ReadingStore::add)
//! (`Ok(None)`), since raising on them would make every real-world feed
//! noisy.
//!
//! Variants are kept small and `Copy`, with no heap-allocated payloads, so
//! errors can be returned from hot paths and stored cheaply.

use thiserror_no_std::Error;

use crate::time::Timestamp;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Input-validation errors - fail immediately and loudly.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ValidationError {
    /// Value outside its physically meaningful range
    #[error("Value {value} outside range [{min}, {max}]")]
    OutOfRange {
        /// The offending input value
        value: f32,
        /// Minimum acceptable value
        min: f32,
        /// Maximum acceptable value
        max: f32,
    },

    /// Value makes no numerical sense (NaN, infinity)
    #[error("Invalid value: not a valid number")]
    InvalidValue,

    /// Latitude outside [-90, 90] passed to a correction that requires one
    #[error("Latitude {latitude} outside [-90, 90]")]
    InvalidLatitude {
        /// The offending latitude in decimal degrees
        latitude: f32,
    },

    /// Query period with start after end
    #[error("Period start {start} is after end {end}")]
    InvalidPeriod {
        /// Requested period start (ms since epoch)
        start: Timestamp,
        /// Requested period end (ms since epoch)
        end: Timestamp,
    },
}
