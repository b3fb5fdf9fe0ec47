//! Test fixtures for the booking widget integration tests
//!
//! Shared builders for configuration, backend clients and the canned
//! March 2024 availability used across the scenarios.
#![allow(dead_code)]

use bookit_config::{ApiConfig, AppConfig};
use bookit_widget::HttpBookingApi;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::time::Duration;

pub const MARCH_5_10AM: &str = "2024-03-05T10:00:00Z";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Range response with one free slot on March 5th 2024
pub fn march_2024_body() -> Value {
    json!({
        "2024-03-05": {
            "slots": [{"time": MARCH_5_10AM, "display": "10:00 AM"}],
            "count": 1
        }
    })
}

/// Configuration pointing straight at `server_uri`, without auto detection
pub fn config_for(server_uri: &str, fallbacks: &[&str]) -> AppConfig {
    AppConfig {
        api: ApiConfig {
            base_url: format!("{}/api", server_uri),
            fallback_urls: fallbacks
                .iter()
                .map(|path| format!("{}{}", server_uri, path))
                .collect(),
            auto_detect: false,
            page_url: format!("{}/", server_uri),
            probe_timeout_ms: 500,
            request_timeout_secs: 5,
            ..ApiConfig::default()
        },
        ..AppConfig::default()
    }
}

/// HTTP backend with a short health probe timeout
pub fn http_api() -> HttpBookingApi {
    HttpBookingApi::with_probe_timeout(Duration::from_millis(500)).expect("client builds")
}
