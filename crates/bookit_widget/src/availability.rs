// --- File: crates/bookit_widget/src/availability.rs ---
//! Per-month availability cache.
//!
//! A month is fetched with a single range query the first time it is asked
//! for and kept for the rest of the session. The cache also owns the
//! "current view": the data of the month the calendar is showing and the
//! derived index of dates that still have free slots.

use bookit_common::models::{parse_availability, DayAvailability, MonthAvailability};
use bookit_common::BookingApi;
use chrono::{Datelike, Days, NaiveDate};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use crate::error::{classify_availability_error, WidgetError};
use crate::locator::ApiLocator;
use crate::lock;

const MIN_YEAR: i32 = -262_000;
const MAX_YEAR: i32 = 262_000;

/// Identifies one cache entry: a year and a zero-based month index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    year: i32,
    month0: u32,
}

impl MonthKey {
    /// `month0` past 11 rolls over into the following years.
    pub fn new(year: i32, month0: u32) -> Self {
        let year = year.saturating_add((month0 / 12) as i32);
        Self {
            year: year.clamp(MIN_YEAR, MAX_YEAR),
            month0: month0 % 12,
        }
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index (January is 0).
    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn first_day(&self) -> NaiveDate {
        // years are clamped to chrono's range, so this never falls back
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let first = self.first_day();
        first
            .checked_add_days(Days::new(u64::from(self.days_in_month()) - 1))
            .unwrap_or(first)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month0 + 1 {
            2 => {
                if is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    pub fn next(&self) -> Self {
        if self.month0 == 11 {
            Self::new(self.year + 1, 0)
        } else {
            Self::new(self.year, self.month0 + 1)
        }
    }

    pub fn prev(&self) -> Self {
        if self.month0 == 0 {
            Self::new(self.year - 1, 11)
        } else {
            Self::new(self.year, self.month0 - 1)
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    /// Calendar header, e.g. "March 2024".
    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month0), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn month_name(month0: u32) -> &'static str {
    match month0 {
        0 => "January",
        1 => "February",
        2 => "March",
        3 => "April",
        4 => "May",
        5 => "June",
        6 => "July",
        7 => "August",
        8 => "September",
        9 => "October",
        10 => "November",
        _ => "December",
    }
}

/// Dates of the active month that have at least one free slot.
///
/// Always rebuilt from month data, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityIndex {
    dates: BTreeSet<NaiveDate>,
}

impl AvailabilityIndex {
    pub fn build(month: &MonthAvailability) -> Self {
        let dates = month
            .values()
            .filter(|day| day.is_available())
            .map(|day| day.date)
            .collect();
        Self { dates }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

#[derive(Default)]
struct CurrentView {
    active: Option<MonthKey>,
    data: Arc<MonthAvailability>,
    index: AvailabilityIndex,
}

/// Session-lifetime cache of month availability.
pub struct AvailabilityCache {
    api: Arc<dyn BookingApi>,
    locator: Arc<ApiLocator>,
    months: Mutex<HashMap<MonthKey, Arc<MonthAvailability>>>,
    view: Mutex<CurrentView>,
}

impl AvailabilityCache {
    pub fn new(api: Arc<dyn BookingApi>, locator: Arc<ApiLocator>) -> Self {
        Self {
            api,
            locator,
            months: Mutex::new(HashMap::new()),
            view: Mutex::new(CurrentView::default()),
        }
    }

    /// Returns a month's availability, fetching it on the first request.
    ///
    /// A failed fetch is not cached. Concurrent misses for the same month
    /// each issue their own request; the first response stored wins.
    pub async fn get_month(&self, month: MonthKey) -> Result<Arc<MonthAvailability>, WidgetError> {
        if let Some(hit) = lock(&self.months).get(&month) {
            debug!("Availability cache hit for {}", month);
            return Ok(hit.clone());
        }

        let base_url = self.locator.base_url()?.to_string();
        debug!("Availability cache miss for {}, fetching", month);
        let raw = self
            .api
            .availability_range(&base_url, month.first_day(), month.last_day())
            .await
            .map_err(|e| classify_availability_error(month, e))?;

        let data = Arc::new(parse_availability(raw));
        info!("Loaded availability for {} ({} days reported)", month, data.len());
        Ok(lock(&self.months).entry(month).or_insert(data).clone())
    }

    /// Makes `month` the active month and loads it into the current view.
    ///
    /// A response for a month that is no longer active by the time it
    /// arrives is cached but leaves the view alone. A failure clears the
    /// view so no stale dates are shown.
    pub async fn load_month(&self, month: MonthKey) -> Result<Arc<MonthAvailability>, WidgetError> {
        lock(&self.view).active = Some(month);

        let result = self.get_month(month).await;

        let mut view = lock(&self.view);
        if view.active != Some(month) {
            debug!("Discarding view update for {}: no longer the active month", month);
            return result;
        }
        match &result {
            Ok(data) => {
                view.index = AvailabilityIndex::build(data);
                view.data = data.clone();
            }
            Err(e) => {
                error!("Failed to load availability for {}: {}", month, e);
                view.data = Arc::default();
                view.index = AvailabilityIndex::default();
            }
        }
        result
    }

    /// Availability of `date` within the current view.
    pub fn day(&self, date: NaiveDate) -> Option<DayAvailability> {
        lock(&self.view).data.get(&date).cloned()
    }

    pub fn index(&self) -> AvailabilityIndex {
        lock(&self.view).index.clone()
    }

    pub fn active_month(&self) -> Option<MonthKey> {
        lock(&self.view).active
    }

    pub fn current(&self) -> Arc<MonthAvailability> {
        lock(&self.view).data.clone()
    }

    pub fn is_cached(&self, month: MonthKey) -> bool {
        lock(&self.months).contains_key(&month)
    }

    /// Bookable dates in `[today, today + days)`, fetching every month the
    /// window touches. The current view is not changed.
    pub async fn upcoming_available_dates(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<NaiveDate>, WidgetError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let last = today
            .checked_add_days(Days::new(u64::from(days) - 1))
            .unwrap_or(NaiveDate::MAX);

        let mut found = Vec::new();
        let mut month = MonthKey::from_date(today);
        let last_month = MonthKey::from_date(last);
        loop {
            let data = self.get_month(month).await?;
            found.extend(
                data.range(today..=last)
                    .filter(|(_, day)| day.is_available())
                    .map(|(date, _)| *date),
            );
            if month >= last_month {
                break;
            }
            month = month.next();
        }
        Ok(found)
    }
}
