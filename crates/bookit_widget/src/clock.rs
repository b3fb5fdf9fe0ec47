//! Source of "today" for past-date checks.

use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

pub trait Clock: Send + Sync {
    /// The current calendar date; days before it are in the past.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, optionally pinned to the business' time zone.
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    time_zone: Option<Tz>,
}

impl SystemClock {
    pub fn new(time_zone: Option<Tz>) -> Self {
        Self { time_zone }
    }

    /// Parses an IANA zone name such as `Europe/Zurich`. Unknown names fall
    /// back to local time.
    pub fn from_config(time_zone: Option<&str>) -> Self {
        let time_zone = time_zone.and_then(|name| match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(e) => {
                warn!("Unknown time zone {:?} ({}), using local time", name, e);
                None
            }
        });
        Self { time_zone }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.time_zone {
            Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
