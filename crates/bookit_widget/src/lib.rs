// --- File: crates/bookit_widget/src/lib.rs ---
// Declare modules within this crate
pub mod availability;
pub mod calendar;
#[cfg(test)]
mod calendar_proptest;
#[cfg(test)]
mod calendar_test;
pub mod clock;
pub mod embed;
pub mod error;
pub mod flow;
pub mod locator;
#[cfg(test)]
mod locator_test;
pub mod notify;
pub mod service;
pub mod startup;

pub use availability::{AvailabilityCache, AvailabilityIndex, MonthKey};
pub use calendar::{render_month, DayCell};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::WidgetError;
pub use flow::{BookingFlow, ContactForm, FlowEvent, FlowStep, Outcome};
pub use locator::{ApiLocator, PageLocation};
pub use notify::{FeedbackSurface, NotificationCenter, NotificationId, NotificationKind};
pub use service::HttpBookingApi;
pub use startup::{bootstrap, BookingWidget};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
