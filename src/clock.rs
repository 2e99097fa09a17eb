//! Time source abstraction.
//!
//! The store reads the current time through [`Clock`] so that TTL expiry
//! is testable without sleeping: production code uses [`SystemClock`],
//! tests construct a [`ManualClock`] and advance it explicitly.

use std::sync::RwLock;
use std::time::Duration;

use time::OffsetDateTime;

use crate::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::clock";

/// Source of "now" for TTL bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Manually advanced clock for deterministic expiry tests.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<OffsetDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant.
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Create a clock frozen at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = rw_write(&self.now, SOURCE, "advance");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *rw_read(&self.now, SOURCE, "now")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::starting_now();
        let first = clock.now();
        assert_eq!(first, clock.now());

        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now() - first, time::Duration::seconds(90));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
