// --- File: crates/bookit_common/src/services.rs ---
//! Service abstractions for the booking backend.
//!
//! The widget core only talks to the backend through [`BookingApi`]. This
//! decouples the flow logic from reqwest and lets tests inject canned
//! responses instead of a live server.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::{external_service_error, BookitError};
use crate::models::{AvailabilityResponse, BookingConfirmation, BookingRequest, ErrorBody};

/// Raw outcome of a failed backend call, before the caller classifies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("backend responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// A 2xx response whose body could not be read.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds a status error, pulling the `error` field out of a JSON body when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: ErrorBody::parse(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<ApiError> for BookitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(msg) => BookitError::HttpError(msg),
            ApiError::Status { status, message } => external_service_error(
                "Booking API",
                format!("Status: {}, Message: {}", status, message.unwrap_or_default()),
            ),
            ApiError::Decode(msg) => BookitError::ParseError(msg),
        }
    }
}

/// A trait for booking backend operations.
///
/// Every call takes the base URL explicitly so the same implementation can
/// probe candidate backends before one is adopted.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET {base}/health`; Ok only for a 2xx answer.
    async fn health(&self, base_url: &str) -> Result<(), ApiError>;

    /// `GET {base}/availability/range` for an inclusive date range.
    async fn availability_range(
        &self,
        base_url: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<AvailabilityResponse, ApiError>;

    /// `POST {base}/book`.
    async fn book(
        &self,
        base_url: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_reads_error_body() {
        let err = ApiError::from_status(400, r#"{"error": "Email is required"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 400,
                message: Some("Email is required".to_string())
            }
        );
        assert_eq!(err.status(), Some(400));
        assert_eq!(ApiError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn test_api_error_into_bookit_error() {
        let err: BookitError = ApiError::from_status(503, "").into();
        assert!(matches!(err, BookitError::ExternalServiceError { .. }));
    }
}
