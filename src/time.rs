//! Time handling for the reading store
//!
//! All timestamps are milliseconds since the Unix epoch. The store never
//! calls a wall clock directly; it goes through the [`TimeSource`] trait so
//! that retention pruning, trailing-window queries and the analyzers can be
//! driven by a fixed clock in tests.

/// Timestamp in milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Timestamp `minutes` before `now`, saturating at zero.
pub fn minutes_before(now: Timestamp, minutes: u32) -> Timestamp {
    now.saturating_sub(minutes as u64 * MS_PER_MINUTE)
}

/// Source of "now" for the store and analyzers.
pub trait TimeSource {
    /// Get current timestamp in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs a test clock).
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std).
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing.
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: Timestamp,
}

impl FixedClock {
    /// Create a clock frozen at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Move the clock to an absolute timestamp.
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = FixedClock::new(1000);
        assert_eq!(clock.now(), 1000);

        clock.advance(500);
        assert_eq!(clock.now(), 1500);

        clock.set(100);
        assert_eq!(clock.now(), 100);
    }

    #[test]
    fn minutes_before_saturates() {
        assert_eq!(minutes_before(600_000, 5), 300_000);
        assert_eq!(minutes_before(60_000, 5), 0);
    }
}
