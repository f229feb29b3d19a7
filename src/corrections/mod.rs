//! Correction pipeline applied to each reading at ingest
//!
//! Three independent, pure corrections composed by the store:
//!
//! 1. [`sea_level`] - removes altitude's effect on pressure via the
//!    international barometric formula
//! 2. [`diurnal`] - removes the semi-diurnal solar-tide oscillation,
//!    latitude- and season-dependent
//! 3. [`smoothing`] - annotates statistical outliers in the trailing hour
//!    with a correction delta
//!
//! Each function takes its inputs explicitly and touches no shared state,
//! so every correction is trivially testable in isolation.

pub mod diurnal;
pub mod sea_level;
pub mod smoothing;

pub use diurnal::{correct_pressure, DiurnalCorrection};
pub use sea_level::adjust_to_sea_level;
