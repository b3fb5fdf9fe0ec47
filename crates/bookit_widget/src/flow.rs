// --- File: crates/bookit_widget/src/flow.rs ---
//! Booking flow state machine.
//!
//! Drives the visitor through `calendar -> time -> form -> confirmation`.
//! The flow never renders anything itself: a host calls the transition
//! methods in response to clicks, then redraws from the accessors (or from
//! [`FlowEvent`]s) after each [`Outcome`].

use bookit_common::models::{BookingConfirmation, BookingRequest, DayAvailability, TimeSlot};
use bookit_common::BookingApi;
use bookit_config::BookingConfig;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::availability::{AvailabilityCache, MonthKey};
use crate::calendar::{render_month, DayCell};
use crate::clock::Clock;
use crate::error::{classify_booking_error, WidgetError};
use crate::locator::ApiLocator;
use crate::lock;
use crate::notify::{FeedbackSurface, Lifetime, NotificationKind, ProgressTicker};

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    Calendar,
    Time,
    Form,
    Confirmation,
}

/// What the visitor has picked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub date_data: Option<DayAvailability>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.date_data.is_none()
    }
}

/// Labels shown above the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    /// e.g. "Tuesday, March 5, 2024"
    pub date_label: String,
    /// The slot's display label.
    pub time_label: String,
}

/// Contact details typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            message: String::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn validate(&self) -> Result<(), WidgetError> {
        if self.full_name.trim().is_empty() {
            return Err(WidgetError::InvalidBookingInput {
                message: Some("Please enter your full name.".to_string()),
            });
        }
        if !self.email.contains('@') {
            return Err(WidgetError::InvalidBookingInput {
                message: Some("Please enter a valid email address.".to_string()),
            });
        }
        Ok(())
    }

    fn into_request(self, start_time: String) -> BookingRequest {
        BookingRequest {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            start_time,
            message: self.message.trim().to_string(),
        }
    }
}

/// A booking the backend accepted, kept for the confirmation step.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingResult {
    pub full_name: String,
    pub email: String,
    pub start_time: String,
    pub message: String,
    /// Server-assigned, or `LOCAL-...` when the backend sent none.
    pub booking_id: String,
    pub confirmation: BookingConfirmation,
}

impl BookingResult {
    fn new(request: BookingRequest, confirmation: BookingConfirmation) -> Self {
        let booking_id = confirmation
            .booking_id()
            .unwrap_or_else(|| format!("LOCAL-{}", Uuid::new_v4().simple()));
        Self {
            full_name: request.full_name,
            email: request.email,
            start_time: request.start_time,
            message: request.message,
            booking_id,
            confirmation,
        }
    }
}

/// Result of one transition request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The flow moved to this step.
    Moved(FlowStep),
    /// Same step, new data (e.g. another month is shown).
    Refreshed,
    /// Not allowed from the current state; nothing changed.
    Ignored,
    /// Another transition or submission is in flight; the request was dropped.
    Busy,
    /// Failed and reported to the visitor; the step is unchanged.
    Failed(WidgetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    StepChanged { from: FlowStep, to: FlowStep },
    BookingConfirmed { booking_id: String },
}

#[derive(Debug, Clone)]
pub struct FlowSettings {
    pub loading_messages: Vec<String>,
    pub progress_interval: Duration,
}

impl FlowSettings {
    pub fn from_config(config: &BookingConfig) -> Self {
        Self {
            loading_messages: config.loading_messages.clone(),
            progress_interval: Duration::from_millis(config.progress_interval_ms),
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::from_config(&BookingConfig::default())
    }
}

struct FlowState {
    step: FlowStep,
    month: MonthKey,
    selection: Selection,
    summary: Option<BookingSummary>,
    result: Option<BookingResult>,
}

/// Holds a flag for as long as it lives.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BookingFlow {
    cache: Arc<AvailabilityCache>,
    locator: Arc<ApiLocator>,
    api: Arc<dyn BookingApi>,
    surface: Arc<dyn FeedbackSurface>,
    clock: Arc<dyn Clock>,
    settings: FlowSettings,
    state: Mutex<FlowState>,
    transitioning: AtomicBool,
    booking: AtomicBool,
    events: broadcast::Sender<FlowEvent>,
}

impl BookingFlow {
    pub fn new(
        cache: Arc<AvailabilityCache>,
        locator: Arc<ApiLocator>,
        api: Arc<dyn BookingApi>,
        surface: Arc<dyn FeedbackSurface>,
        clock: Arc<dyn Clock>,
        settings: FlowSettings,
    ) -> Self {
        let month = MonthKey::from_date(clock.today());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            cache,
            locator,
            api,
            surface,
            clock,
            settings,
            state: Mutex::new(FlowState {
                step: FlowStep::Calendar,
                month,
                selection: Selection::default(),
                summary: None,
                result: None,
            }),
            transitioning: AtomicBool::new(false),
            booking: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    /// Resets the flow and loads the month containing today.
    pub async fn start(&self) -> Outcome {
        self.reset();
        let month = MonthKey::from_date(self.clock.today());
        lock(&self.state).month = month;
        self.load_view(month).await
    }

    pub fn step(&self) -> FlowStep {
        lock(&self.state).step
    }

    pub fn month(&self) -> MonthKey {
        lock(&self.state).month
    }

    pub fn selection(&self) -> Selection {
        lock(&self.state).selection.clone()
    }

    pub fn summary(&self) -> Option<BookingSummary> {
        lock(&self.state).summary.clone()
    }

    pub fn result(&self) -> Option<BookingResult> {
        lock(&self.state).result.clone()
    }

    /// Slots of the selected date, in backend order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        lock(&self.state)
            .selection
            .date_data
            .as_ref()
            .map(|day| day.slots.clone())
            .unwrap_or_default()
    }

    pub fn is_booking(&self) -> bool {
        self.booking.load(Ordering::Acquire)
    }

    /// The grid of the shown month, judged against today's date.
    pub fn calendar_cells(&self) -> Vec<DayCell> {
        render_month(self.month(), &self.cache.index(), self.clock.today())
    }

    /// Shows another month on the calendar step. Months before the current
    /// one are ignored.
    pub async fn show_month(&self, month: MonthKey) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };
        {
            let mut state = lock(&self.state);
            if state.step != FlowStep::Calendar {
                return Outcome::Ignored;
            }
            if month < MonthKey::from_date(self.clock.today()) {
                debug!("Ignoring navigation to past month {}", month);
                return Outcome::Ignored;
            }
            state.month = month;
        }
        self.load_view(month).await
    }

    pub async fn next_month(&self) -> Outcome {
        self.show_month(self.month().next()).await
    }

    pub async fn previous_month(&self) -> Outcome {
        self.show_month(self.month().prev()).await
    }

    /// `calendar -> time`. Only interactive cells are accepted; anything else
    /// is ignored without feedback.
    pub fn select_date(&self, date: NaiveDate) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };
        let mut state = lock(&self.state);
        if state.step != FlowStep::Calendar {
            return Outcome::Ignored;
        }

        let eligible = state.month.contains(date)
            && date >= self.clock.today()
            && self.cache.index().contains(date);
        let day = match self.cache.day(date) {
            Some(day) if eligible => day,
            _ => {
                debug!("Ignoring click on non-bookable date {}", date);
                return Outcome::Ignored;
            }
        };

        state.selection.date = Some(date);
        state.selection.date_data = Some(day);
        self.move_to(&mut state, FlowStep::Time)
    }

    /// `time -> form`. `time` is the slot's canonical identifier.
    pub fn select_time(&self, time: &str) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };
        let mut state = lock(&self.state);
        if state.step != FlowStep::Time {
            return Outcome::Ignored;
        }
        let (Some(date), Some(day)) = (state.selection.date, state.selection.date_data.as_ref()) else {
            return Outcome::Ignored;
        };
        let Some(slot) = day.slot(time) else {
            debug!("Ignoring unknown slot {}", time);
            return Outcome::Ignored;
        };

        let summary = BookingSummary {
            date_label: date.format("%A, %B %-d, %Y").to_string(),
            time_label: slot.display.clone(),
        };
        state.selection.time = Some(time.to_string());
        state.summary = Some(summary);
        self.move_to(&mut state, FlowStep::Form)
    }

    /// `time -> calendar` or `form -> time`, dropping what the left step picked.
    pub fn back(&self) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };
        let mut state = lock(&self.state);
        match state.step {
            FlowStep::Time => {
                state.selection = Selection::default();
                state.summary = None;
                self.move_to(&mut state, FlowStep::Calendar)
            }
            FlowStep::Form => {
                state.selection.time = None;
                state.summary = None;
                self.move_to(&mut state, FlowStep::Time)
            }
            FlowStep::Calendar | FlowStep::Confirmation => Outcome::Ignored,
        }
    }

    /// Back to an empty calendar step. Calling it again changes nothing.
    pub fn reset(&self) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };
        let mut state = lock(&self.state);
        state.selection = Selection::default();
        state.summary = None;
        state.result = None;
        if state.step != FlowStep::Calendar {
            self.move_to(&mut state, FlowStep::Calendar);
        }
        Outcome::Moved(FlowStep::Calendar)
    }

    /// `form -> confirmation`.
    ///
    /// The loader cycles through the progress messages while the request is
    /// outstanding. On failure the flow stays on the form and the visitor may
    /// submit again.
    pub async fn submit(&self, form: ContactForm) -> Outcome {
        let Some(_booking) = InFlight::acquire(&self.booking) else {
            debug!("Dropping submit: a booking is already in flight");
            return Outcome::Busy;
        };
        let Some(_guard) = InFlight::acquire(&self.transitioning) else {
            return Outcome::Busy;
        };

        let start_time = {
            let state = lock(&self.state);
            match (state.step, state.selection.time.clone()) {
                (FlowStep::Form, Some(time)) => time,
                _ => return Outcome::Ignored,
            }
        };
        if let Err(e) = form.validate() {
            return self.fail(e);
        }
        let base_url = match self.locator.base_url() {
            Ok(url) => url.to_string(),
            Err(e) => return self.fail(e),
        };

        let request = form.into_request(start_time);
        let ticker = ProgressTicker::start(
            self.surface.clone(),
            self.settings.loading_messages.clone(),
            self.settings.progress_interval,
        );
        let response = self.api.book(&base_url, &request).await;
        ticker.stop();

        match response {
            Ok(confirmation) => {
                let result = BookingResult::new(request, confirmation);
                let booking_id = result.booking_id.clone();
                info!("Booking confirmed: {} at {}", booking_id, result.start_time);
                let outcome = {
                    let mut state = lock(&self.state);
                    state.result = Some(result);
                    self.move_to(&mut state, FlowStep::Confirmation)
                };
                let _ = self.events.send(FlowEvent::BookingConfirmed { booking_id });
                outcome
            }
            Err(e) => self.fail(classify_booking_error(e)),
        }
    }

    async fn load_view(&self, month: MonthKey) -> Outcome {
        match self.cache.load_month(month).await {
            Ok(_) => Outcome::Refreshed,
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, err: WidgetError) -> Outcome {
        error!("Booking flow error: {}", err);
        self.surface
            .notify(NotificationKind::Error, &err.user_message(), Lifetime::Default);
        Outcome::Failed(err)
    }

    fn move_to(&self, state: &mut FlowState, to: FlowStep) -> Outcome {
        let from = state.step;
        state.step = to;
        debug!("Flow step {:?} -> {:?}", from, to);
        // no subscribers is fine
        let _ = self.events.send(FlowEvent::StepChanged { from, to });
        Outcome::Moved(to)
    }
}
