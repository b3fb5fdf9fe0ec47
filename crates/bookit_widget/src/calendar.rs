// --- File: crates/bookit_widget/src/calendar.rs ---
//! Month grid rendering.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::availability::{AvailabilityIndex, MonthKey};

/// Six weeks, so every month fits regardless of its first weekday.
pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One date cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    /// Strictly before the caller's "today".
    pub is_past: bool,
    pub is_available: bool,
}

impl DayCell {
    /// Only these cells react to clicks.
    pub fn is_interactive(&self) -> bool {
        self.in_current_month && !self.is_past && self.is_available
    }
}

/// Lays out `month` as 42 consecutive days starting on the Sunday on or
/// before the 1st.
pub fn render_month(month: MonthKey, index: &AvailabilityIndex, today: NaiveDate) -> Vec<DayCell> {
    let first = month.first_day();
    let lead = u64::from(first.weekday().num_days_from_sunday());
    let start = first.checked_sub_days(Days::new(lead)).unwrap_or(first);

    start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| DayCell {
            date,
            in_current_month: month.contains(date),
            is_past: date < today,
            is_available: index.contains(date),
        })
        .collect()
}
