// --- File: crates/bookit_widget/src/error.rs ---
use bookit_common::{
    config_error, conflict, external_service_error, internal_error, validation_error, ApiError, BookitError,
};
use thiserror::Error;

use crate::availability::MonthKey;

/// Failures the widget surfaces to the visitor.
///
/// Each one is recovered where it happens and turned into a notification;
/// only `NoBackendAvailable` stops the widget from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// Every candidate backend failed its health check.
    #[error("no booking backend answered the health check (tried: {})", .tried.join(", "))]
    NoBackendAvailable { tried: Vec<String> },

    /// The widget was configured with values it cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A network call was attempted before a backend was adopted.
    #[error("no booking backend has been adopted yet")]
    NotReady,

    /// The range query for a month failed.
    #[error("failed to load availability for {month}: {reason}")]
    AvailabilityLoadFailed { month: MonthKey, reason: String },

    /// 409 on submission: someone else took the slot.
    #[error("the selected slot is no longer available")]
    SlotNoLongerAvailable,

    /// 400 on submission, or a form that failed the local check.
    #[error("invalid booking input: {}", .message.as_deref().unwrap_or("rejected by backend"))]
    InvalidBookingInput { message: Option<String> },

    /// Any other failed status, or an unusable answer, on submission.
    #[error("booking backend unavailable (status: {status:?})")]
    BackendUnavailable { status: Option<u16> },

    /// The request never got an HTTP response.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl WidgetError {
    /// Text shown to the visitor in a notification.
    pub fn user_message(&self) -> String {
        match self {
            WidgetError::NoBackendAvailable { .. }
            | WidgetError::NotReady
            | WidgetError::InvalidConfiguration(_) => {
                "Booking system is currently unavailable. Please try again later or contact us directly."
                    .to_string()
            }
            WidgetError::AvailabilityLoadFailed { month, .. } => format!(
                "Unable to load availability for {}. Please try again.",
                month.label()
            ),
            WidgetError::SlotNoLongerAvailable => {
                "Sorry, this time slot is no longer available. Please select another time."
                    .to_string()
            }
            WidgetError::InvalidBookingInput { message } => message
                .clone()
                .unwrap_or_else(|| "Please check your details and try again.".to_string()),
            WidgetError::BackendUnavailable { .. } => {
                "Our booking system is temporarily unavailable. Please try again in a few minutes."
                    .to_string()
            }
            WidgetError::TransportFailure(_) => {
                "Unable to connect to the booking service. Please check your connection and try again."
                    .to_string()
            }
        }
    }
}

/// Classifies a failed range query.
pub fn classify_availability_error(month: MonthKey, err: ApiError) -> WidgetError {
    match err {
        ApiError::Transport(reason) => WidgetError::TransportFailure(reason),
        other => WidgetError::AvailabilityLoadFailed {
            month,
            reason: other.to_string(),
        },
    }
}

/// Classifies a failed booking submission.
///
/// Only 400 blames the visitor's input. Other 4xx answers (401, 404, ...)
/// point at a misconfigured backend and are reported as unavailable.
pub fn classify_booking_error(err: ApiError) -> WidgetError {
    match err {
        ApiError::Transport(reason) => WidgetError::TransportFailure(reason),
        ApiError::Status { status: 409, .. } => WidgetError::SlotNoLongerAvailable,
        ApiError::Status { status: 400, message } => WidgetError::InvalidBookingInput { message },
        ApiError::Status { status, .. } => WidgetError::BackendUnavailable {
            status: Some(status),
        },
        ApiError::Decode(_) => WidgetError::BackendUnavailable { status: None },
    }
}

/// Convert WidgetError to BookitError
impl From<WidgetError> for BookitError {
    fn from(err: WidgetError) -> Self {
        match err {
            WidgetError::NoBackendAvailable { tried } => external_service_error(
                "Booking API",
                format!("no backend answered the health check (tried: {})", tried.join(", ")),
            ),
            WidgetError::InvalidConfiguration(msg) => config_error(msg),
            WidgetError::NotReady => internal_error("booking backend used before discovery"),
            WidgetError::AvailabilityLoadFailed { month, reason } => external_service_error(
                "Booking API",
                format!("availability for {}: {}", month, reason),
            ),
            WidgetError::SlotNoLongerAvailable => conflict("slot no longer available"),
            WidgetError::InvalidBookingInput { message } => {
                validation_error(message.unwrap_or_else(|| "invalid booking input".to_string()))
            }
            WidgetError::BackendUnavailable { status } => external_service_error(
                "Booking API",
                format!("unavailable (status: {:?})", status),
            ),
            WidgetError::TransportFailure(msg) => BookitError::HttpError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_booking_errors_are_classified_by_status() {
        assert_eq!(
            classify_booking_error(status(409, None)),
            WidgetError::SlotNoLongerAvailable
        );
        assert_eq!(
            classify_booking_error(status(400, Some("Email is invalid"))),
            WidgetError::InvalidBookingInput {
                message: Some("Email is invalid".to_string())
            }
        );
        assert_eq!(
            classify_booking_error(status(503, None)),
            WidgetError::BackendUnavailable { status: Some(503) }
        );
        assert_eq!(
            classify_booking_error(ApiError::Transport("connection refused".into())),
            WidgetError::TransportFailure("connection refused".into())
        );
    }

    #[test]
    fn test_other_client_errors_are_not_blamed_on_input() {
        for code in [401, 403, 404, 422] {
            let err = classify_booking_error(status(code, Some("Not Found")));
            assert_eq!(err, WidgetError::BackendUnavailable { status: Some(code) });
            assert_eq!(
                err.user_message(),
                "Our booking system is temporarily unavailable. Please try again in a few minutes."
            );
        }
    }

    #[test]
    fn test_invalid_input_message_is_surfaced_verbatim() {
        let err = classify_booking_error(status(400, Some("Name is required")));
        assert_eq!(err.user_message(), "Name is required");

        let err = classify_booking_error(status(400, None));
        assert_eq!(err.user_message(), "Please check your details and try again.");
    }

    #[test]
    fn test_availability_errors_keep_month() {
        let march = MonthKey::new(2024, 2);
        let err = classify_availability_error(march, status(500, None));
        assert!(matches!(err, WidgetError::AvailabilityLoadFailed { month, .. } if month == march));
        assert!(err.user_message().contains("March 2024"));

        let err = classify_availability_error(march, ApiError::Transport("reset".into()));
        assert!(matches!(err, WidgetError::TransportFailure(_)));
    }

    #[test]
    fn test_conversion_into_bookit_error() {
        let err: BookitError = WidgetError::SlotNoLongerAvailable.into();
        assert!(matches!(err, BookitError::ConflictError(_)));

        let err: BookitError = WidgetError::NoBackendAvailable {
            tried: vec!["http://localhost:5000/api".to_string()],
        }
        .into();
        assert_eq!(
            err.to_string(),
            "External service error: Booking API - no backend answered the health check (tried: http://localhost:5000/api)"
        );
    }
}
