//! Clock abstraction so "now" is injectable.
//!
//! Every past/future decision in core (upcoming filter, `created_at`,
//! `registered_at`) reads time through [`Clock`], never `Utc::now()` directly.

use chrono::{DateTime, Utc};

/// Source of the current absolute instant.
pub trait Clock {
    /// Returns the current time in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant. Used by tests and replay tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn fixed_clock_always_returns_same_instant() {
        let instant = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!((&clock).now(), instant);
    }

    #[test]
    fn system_clock_moves_forward() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }
}
