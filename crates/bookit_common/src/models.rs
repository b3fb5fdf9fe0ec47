// --- File: crates/bookit_common/src/models.rs ---
//! Wire models exchanged with the booking backend.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Date keys on the wire are plain calendar dates.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// One bookable start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Canonical identifier, usually an ISO 8601 timestamp.
    pub time: String,
    /// Human readable label, e.g. "10:00 AM".
    pub display: String,
}

/// A day entry as the range endpoint reports it. The date is the key of the
/// enclosing map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySlots {
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Body of `GET /availability/range`: date key -> day entry.
pub type AvailabilityResponse = BTreeMap<String, DaySlots>;

/// Bookable slots for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub count: usize,
}

impl DayAvailability {
    /// `count` is always the number of slots; a disagreeing wire count is
    /// logged and dropped.
    pub fn from_wire(date: NaiveDate, raw: DaySlots) -> Self {
        let count = raw.slots.len();
        if let Some(reported) = raw.count.filter(|reported| *reported != count) {
            warn!(
                "Availability for {} reports count {} but lists {} slots; using the slots",
                date, reported, count
            );
        }
        Self {
            date,
            slots: raw.slots,
            count,
        }
    }

    pub fn is_available(&self) -> bool {
        self.count > 0
    }

    /// Looks up a slot by its canonical identifier.
    pub fn slot(&self, time: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|slot| slot.time == time)
    }
}

/// One month's worth of availability, keyed by date.
pub type MonthAvailability = BTreeMap<NaiveDate, DayAvailability>;

/// Converts a range response into typed day entries.
///
/// Keys that are not `YYYY-MM-DD` dates are skipped.
pub fn parse_availability(raw: AvailabilityResponse) -> MonthAvailability {
    raw.into_iter()
        .filter_map(|(key, day)| match NaiveDate::parse_from_str(&key, DATE_KEY_FORMAT) {
            Ok(date) => Some((date, DayAvailability::from_wire(date, day))),
            Err(e) => {
                warn!("Skipping availability entry with invalid date key {:?}: {}", key, e);
                None
            }
        })
        .collect()
}

/// Query string of the range endpoint.
#[derive(Debug, Serialize)]
pub struct RangeQuery {
    pub range_start: String,
    pub range_end: String,
}

impl RangeQuery {
    pub fn new(range_start: NaiveDate, range_end: NaiveDate) -> Self {
        Self {
            range_start: range_start.format(DATE_KEY_FORMAT).to_string(),
            range_end: range_end.format(DATE_KEY_FORMAT).to_string(),
        }
    }
}

/// Body of `POST /book`. Built right before submission and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    pub full_name: String,
    pub email: String,
    pub start_time: String,
    pub message: String,
}

/// Successful `POST /book` response, kept verbatim for the confirmation view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingConfirmation {
    pub payload: Value,
}

impl BookingConfirmation {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Server assigned booking id, if the backend sent one.
    pub fn booking_id(&self) -> Option<String> {
        match self.payload.get("booking_id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-effort extraction of the server's error message.
    pub fn parse(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed
            .error
            .or(parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}
