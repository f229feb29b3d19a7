//! Frontal-Passage Pattern Detection
//!
//! A weather front leaves a characteristic three-hour pressure signature:
//! an approaching cold front shows sustained fall, its passage a sharp
//! fall followed by a rise, a building high a sustained rise. The analyzer
//! cuts the trailing three hours into three one-hour segments, fits each
//! segment by least squares and classifies the predicted one-hour change
//! as Rising (R), Falling (F) or Steady (S). The concatenated three-letter
//! pattern indexes a static signature table describing the likely frontal
//! event.
//!
//! A segment with fewer than two distinct-time readings cannot be fitted
//! and the whole analysis reports nothing rather than guessing. Patterns
//! with no table entry (meteorological noise like "FSF") also report
//! nothing.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::analysis::regression;
use crate::config::Config;
use crate::reading::Reading;
use crate::store::ReadingStore;
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

/// Predicted hourly change below which a segment counts as steady, Pa.
const STEADY_BAND_PA: f64 = 10.0;

/// Shape of one hourly segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentShape {
    /// Predicted hourly change above +10 Pa.
    Rising,
    /// Predicted hourly change below -10 Pa.
    Falling,
    /// Predicted hourly change within the ±10 Pa band.
    Steady,
}

impl SegmentShape {
    /// Single-letter code used in the pattern key.
    pub fn letter(&self) -> u8 {
        match self {
            Self::Rising => b'R',
            Self::Falling => b'F',
            Self::Steady => b'S',
        }
    }
}

/// One entry of the front-signature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrontSignature {
    /// Three-letter R/F/S pattern, oldest segment first.
    pub pattern: &'static str,
    /// Short name of the frontal event.
    pub event: &'static str,
    /// One-line description of the expected development.
    pub summary: &'static str,
}

/// Known three-hour pressure signatures. Patterns without an entry carry
/// no recognized frontal meaning.
pub const FRONT_SIGNATURES: &[FrontSignature] = &[
    FrontSignature {
        pattern: "SSS",
        event: "Stable conditions",
        summary: "No frontal activity; pressure flat for three hours",
    },
    FrontSignature {
        pattern: "RRR",
        event: "Building high",
        summary: "Sustained rise; anticyclone strengthening, improving weather",
    },
    FrontSignature {
        pattern: "FFF",
        event: "Approaching low",
        summary: "Sustained fall; depression or cold front approaching",
    },
    FrontSignature {
        pattern: "FFR",
        event: "Cold front passage",
        summary: "Pressure minimum just passed; expect veering wind and clearing",
    },
    FrontSignature {
        pattern: "FFS",
        event: "Trough passage",
        summary: "Fall leveling off; axis of the trough passing nearby",
    },
    FrontSignature {
        pattern: "FRR",
        event: "Post-frontal recovery",
        summary: "Sharp recovery behind a front; gusty but improving",
    },
    FrontSignature {
        pattern: "RFF",
        event: "Ridge giving way",
        summary: "High retreating ahead of the next system; deterioration likely",
    },
    FrontSignature {
        pattern: "RRF",
        event: "Ridge crest passed",
        summary: "Rise topping out and turning; next front within a day",
    },
    FrontSignature {
        pattern: "RRS",
        event: "High establishing",
        summary: "Rise flattening into settled anticyclonic weather",
    },
    FrontSignature {
        pattern: "SFF",
        event: "Warm front approaching",
        summary: "Steady giving way to persistent fall; thickening cloud expected",
    },
    FrontSignature {
        pattern: "SRR",
        event: "Improvement setting in",
        summary: "Flat spell ending with a sustained rise",
    },
];

/// Recognized frontal situation over the trailing three hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrontForecast {
    /// Segment shapes, oldest first.
    pub shapes: [SegmentShape; 3],
    /// Matched signature table entry.
    pub signature: &'static FrontSignature,
}

impl FrontForecast {
    /// The three-letter pattern key.
    pub fn pattern(&self) -> &'static str {
        self.signature.pattern
    }
}

/// Classify one segment's readings by their predicted hourly change.
///
/// The fit runs over minutes-ago, so a chronologically rising segment has
/// a negative slope; the predicted change over one hour is `-60·slope`.
fn segment_shape(readings: &[Reading], now: Timestamp, config: &Config) -> Option<SegmentShape> {
    let points: Vec<(f64, f64)> = readings
        .iter()
        .map(|r| {
            let minutes_ago = (now.saturating_sub(r.timestamp)) as f64 / MS_PER_MINUTE as f64;
            (minutes_ago, r.effective_pressure(config) as f64)
        })
        .collect();

    let line = regression::fit(&points)?;
    let hourly_delta = -60.0 * line.slope;

    if libm::fabs(hourly_delta) < STEADY_BAND_PA {
        Some(SegmentShape::Steady)
    } else if hourly_delta > 0.0 {
        Some(SegmentShape::Rising)
    } else {
        Some(SegmentShape::Falling)
    }
}

/// Detect a frontal signature in the store's trailing three hours.
///
/// Returns `None` when any hourly segment cannot be regressed or the
/// resulting pattern has no table entry.
pub fn forecast<C: TimeSource>(store: &ReadingStore<C>) -> Option<FrontForecast> {
    let config = store.config();
    let now = store.now();

    let bounds = [
        (minutes_before(now, 180), minutes_before(now, 120)),
        (minutes_before(now, 120), minutes_before(now, 60)),
        (minutes_before(now, 60), now),
    ];

    let mut shapes = [SegmentShape::Steady; 3];
    for (i, (start, end)) in bounds.iter().enumerate() {
        // start <= end by construction, the range query cannot fail
        let segment = store.readings_between(*start, *end).ok()?;
        shapes[i] = segment_shape(&segment, now, config)?;
    }

    let key = [shapes[0].letter(), shapes[1].letter(), shapes[2].letter()];
    log_debug!(
        "front pattern: {}{}{}",
        key[0] as char,
        key[1] as char,
        key[2] as char
    );

    let signature = FRONT_SIGNATURES
        .iter()
        .find(|sig| sig.pattern.as_bytes() == key)?;

    Some(FrontForecast { shapes, signature })
}
