// --- File: crates/bookit_widget/src/service.rs ---
//! HTTP implementation of the booking backend.
//!
//! This module provides an implementation of the BookingApi trait on top of reqwest.

use async_trait::async_trait;
use bookit_common::models::{
    AvailabilityResponse, BookingConfirmation, BookingRequest, RangeQuery,
};
use bookit_common::{create_client, default_client, ApiError, BookingApi, BookitError, Context};
use bookit_config::ApiConfig;
use chrono::NaiveDate;
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Joins a base URL and an endpoint path without doubling slashes.
fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::from_status(status, &body)
}

/// reqwest-backed booking backend.
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: Client,
    probe_timeout: Duration,
}

impl HttpBookingApi {
    /// Create a new HTTP booking backend.
    pub fn new(client: Client, probe_timeout: Duration) -> Self {
        Self {
            client,
            probe_timeout,
        }
    }

    /// Default client settings with the given health probe timeout.
    pub fn with_probe_timeout(probe_timeout: Duration) -> Result<Self, BookitError> {
        let client = default_client().context("building the booking API client")?;
        Ok(Self::new(client, probe_timeout))
    }

    /// Builds a client with the configured request timeout.
    pub fn from_config(config: &ApiConfig) -> Result<Self, BookitError> {
        let client = create_client(config.request_timeout_secs, true)
            .context("building the booking API client")?;
        Ok(Self::new(client, Duration::from_millis(config.probe_timeout_ms)))
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn health(&self, base_url: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .get(endpoint(base_url, "health"))
            .header(header::ACCEPT, "application/json")
            .timeout(self.probe_timeout)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }

    async fn availability_range(
        &self,
        base_url: &str,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<AvailabilityResponse, ApiError> {
        let query = serde_urlencoded::to_string(RangeQuery::new(range_start, range_end))
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let url = format!("{}?{}", endpoint(base_url, "availability/range"), query);
        debug!("Fetching availability: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json::<AvailabilityResponse>().await?)
    }

    async fn book(
        &self,
        base_url: &str,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, ApiError> {
        let response = self
            .client
            .post(endpoint(base_url, "book"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        // The booking is committed once the status is 2xx. Whatever happens to
        // the body from here on only costs us the server-side id.
        let payload = match response.text().await {
            Ok(body) if body.trim().is_empty() => Value::Null,
            Ok(body) => serde_json::from_str(&body).unwrap_or_else(|e| {
                warn!("Booking succeeded but the response body was not JSON: {}", e);
                Value::Null
            }),
            Err(e) => {
                warn!("Booking succeeded but the response body could not be read: {}", e);
                Value::Null
            }
        };
        Ok(BookingConfirmation::new(payload))
    }
}

/// In-memory backend for tests and offline hosts.
pub mod mock {
    use super::*;
    use bookit_common::models::{DaySlots, TimeSlot, DATE_KEY_FORMAT};
    use serde_json::json;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    use crate::lock;

    /// One recorded backend call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ApiCall {
        Health(String),
        Range { start: NaiveDate, end: NaiveDate },
        Book(BookingRequest),
    }

    /// Serves canned availability and booking answers and records every call.
    #[derive(Default)]
    pub struct InMemoryBookingApi {
        days: Mutex<AvailabilityResponse>,
        unhealthy: Mutex<HashSet<String>>,
        range_failures: Mutex<VecDeque<ApiError>>,
        booking_responses: Mutex<VecDeque<Result<BookingConfirmation, ApiError>>>,
        latency: Mutex<Duration>,
        calls: Mutex<Vec<ApiCall>>,
    }

    impl InMemoryBookingApi {
        /// Create a new in-memory backend with no availability.
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a day with the given `(time, display)` slots.
        pub fn with_day(self, date: &str, slots: &[(&str, &str)]) -> Self {
            let slots: Vec<TimeSlot> = slots
                .iter()
                .map(|(time, display)| TimeSlot {
                    time: time.to_string(),
                    display: display.to_string(),
                })
                .collect();
            let count = slots.len();
            lock(&self.days).insert(
                date.to_string(),
                DaySlots {
                    slots,
                    count: Some(count),
                },
            );
            self
        }

        /// Marks a base URL as failing its health check.
        pub fn with_unhealthy(self, base_url: &str) -> Self {
            lock(&self.unhealthy).insert(base_url.to_string());
            self
        }

        /// Every call waits this long before answering.
        pub fn with_latency(self, latency: Duration) -> Self {
            *lock(&self.latency) = latency;
            self
        }

        /// The next range query fails with `err`.
        pub fn fail_next_range(&self, err: ApiError) {
            lock(&self.range_failures).push_back(err);
        }

        /// Queues the answer to the next booking. Without a queued answer a
        /// booking succeeds with id `BK-TEST`.
        pub fn push_booking_response(&self, response: Result<BookingConfirmation, ApiError>) {
            lock(&self.booking_responses).push_back(response);
        }

        pub fn calls(&self) -> Vec<ApiCall> {
            lock(&self.calls).clone()
        }

        pub fn range_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|call| matches!(call, ApiCall::Range { .. }))
                .count()
        }

        pub fn booked_requests(&self) -> Vec<BookingRequest> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    ApiCall::Book(request) => Some(request),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: ApiCall) {
            lock(&self.calls).push(call);
        }

        async fn pause(&self) {
            let latency = *lock(&self.latency);
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
        }
    }

    #[async_trait]
    impl BookingApi for InMemoryBookingApi {
        async fn health(&self, base_url: &str) -> Result<(), ApiError> {
            self.record(ApiCall::Health(base_url.to_string()));
            self.pause().await;
            if lock(&self.unhealthy).contains(base_url) {
                Err(ApiError::Transport(format!("{} refused the connection", base_url)))
            } else {
                Ok(())
            }
        }

        async fn availability_range(
            &self,
            _base_url: &str,
            range_start: NaiveDate,
            range_end: NaiveDate,
        ) -> Result<AvailabilityResponse, ApiError> {
            self.record(ApiCall::Range {
                start: range_start,
                end: range_end,
            });
            self.pause().await;
            if let Some(err) = lock(&self.range_failures).pop_front() {
                return Err(err);
            }
            let days = lock(&self.days);
            Ok(days
                .iter()
                .filter(|(key, _)| {
                    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
                        .map(|date| date >= range_start && date <= range_end)
                        .unwrap_or(true)
                })
                .map(|(key, day)| (key.clone(), day.clone()))
                .collect())
        }

        async fn book(
            &self,
            _base_url: &str,
            request: &BookingRequest,
        ) -> Result<BookingConfirmation, ApiError> {
            self.record(ApiCall::Book(request.clone()));
            self.pause().await;
            let queued = lock(&self.booking_responses).pop_front();
            queued.unwrap_or_else(|| {
                Ok(BookingConfirmation::new(json!({
                    "booking_id": "BK-TEST",
                    "start_time": request.start_time,
                })))
            })
        }
    }
}
