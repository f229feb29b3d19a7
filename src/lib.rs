//! Calibrated barometric-pressure time series for weather tendency analysis
//!
//! Turns raw pressure observations from a single barometer feed into a
//! corrected, time-ordered series and derives short-term weather signals
//! from it.
//!
//! Key pieces:
//! - Correction pipeline: sea-level adjustment, diurnal-rhythm correction
//!   and outlier smoothing applied once, at ingest
//! - [`ReadingStore`]: retention, de-duplication and time-based queries over
//!   the corrected series
//! - Analyzers: pressure trend over two look-back windows, frontal-passage
//!   pattern over three hourly regressions, Low/Normal/High system state
//!
//! ```no_run
//! use barotrend::{Config, ReadingStore, SensorMeta};
//! use barotrend::analysis::trend;
//!
//! let mut store = ReadingStore::new(Config::default());
//!
//! store.add(None, 101_320.0, SensorMeta::default()).unwrap();
//! store.add(None, 101_305.0, SensorMeta::default()).unwrap();
//!
//! if let Some(forecast) = trend::forecast(&store) {
//!     // e.g. Falling / Slowly
//!     let _ = (forecast.tendency, forecast.trend);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod analysis;
pub mod config;
pub mod corrections;
pub mod errors;
pub mod reading;
pub mod store;
pub mod time;

// Public API
pub use config::Config;
pub use errors::{ValidationError, ValidationResult};
pub use reading::{Reading, ReadingMeta, SensorMeta};
pub use store::ReadingStore;
pub use time::{FixedClock, Timestamp, TimeSource};

#[cfg(feature = "std")]
pub use time::SystemClock;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
