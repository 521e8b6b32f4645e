//! Wall clock abstraction
//!
//! The booking window is computed from the club's local calendar day, so
//! commands read time through [`Clock`] and tests pin it with [`FixedClock`].

use chrono::{DateTime, Local, NaiveDate, Utc};

pub trait Clock: Send + Sync {
    /// Current instant, used for `created_at` / audit timestamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the club's local time zone.
    fn today(&self) -> NaiveDate;
}

/// System clock in the process' local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen on a given day; `now()` still advances so ordering holds.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
