//! Time source for scheduling.
//!
//! Scheduling works at day granularity. A study day may start after
//! midnight (`day_start_hour`), so late-night reviews still count towards the
//! previous day.

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

/// Source of the current instant and the current study day.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current wall-clock instant.
    fn now(&self) -> DateTime<Local>;

    /// The current study day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    day_start_hour: u32,
}

impl SystemClock {
    /// A clock whose study day starts at midnight.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock whose study day starts at `hour` (0-23, larger values clamp to 23).
    pub fn with_day_start_hour(hour: u32) -> Self {
        Self {
            day_start_hour: hour.min(23),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn today(&self) -> NaiveDate {
        study_day(self.now(), self.day_start_hour)
    }
}

/// Resolve the study day for an instant given the hour a new day begins.
pub fn study_day(now: DateTime<Local>, day_start_hour: u32) -> NaiveDate {
    if now.hour() < day_start_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Convert a naive local timestamp to a zoned one.
///
/// Ambiguous times (DST fold) resolve to the earlier instant; nonexistent
/// times (DST gap) are read as UTC.
pub fn local_from_naive(naive: NaiveDateTime) -> DateTime<Local> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    /// A clock frozen at `now`.
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// A clock frozen at noon on `date`.
    pub fn on(date: NaiveDate) -> Self {
        Self::new(local_from_naive(date.and_time(NaiveTime::MIN) + Duration::hours(12)))
    }

    /// Move the clock forward by whole days.
    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::days(days);
    }

    /// Jump to noon on `date`.
    pub fn set_date(&self, date: NaiveDate) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = local_from_naive(date.and_time(NaiveTime::MIN) + Duration::hours(12));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
