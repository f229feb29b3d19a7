//! Analyzers deriving weather signals from the reading series
//!
//! Each analyzer is stateless between calls: it reads the store (or a
//! reading slice), computes, and returns either a result or `None` when
//! the series is too young to say anything. Nothing here caches - the
//! retained series is small and bounded, and recomputing keeps every
//! analyzer a pure function of its inputs.
//!
//! - [`trend`]: rate-of-change classification over 1 h and 3 h windows
//! - [`front`]: three-hourly-segment regression pattern for frontal passage
//! - [`system`]: Low/Normal/High pressure-system classification
//! - [`regression`]: the shared least-squares fit

pub mod front;
pub mod regression;
pub mod system;
pub mod trend;
