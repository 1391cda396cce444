//! Local wall-clock time for meal resolution and diary dates.
//!
//! The embedded host may run in UTC while the user lives elsewhere, so an
//! IANA zone (e.g. "Europe/London") can be configured. Without one the system
//! local zone is used. Meal windows and entry dates are both derived from the
//! same [`Clock::now`] reading, so a scan at 23:59 never lands on the next
//! day's diary.

use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the real clock, in `tz` if given, otherwise in the system zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock {
    tz: Option<Tz>,
}

impl LocalClock {
    pub fn new(tz: Option<Tz>) -> Self {
        Self { tz }
    }
}

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        match self.tz {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// A clock stuck at one instant. Handy for replaying scans and for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parses an IANA zone name.
pub fn parse_tz(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| format!("bad tz: {e}"))
}
