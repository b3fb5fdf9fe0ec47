// --- File: crates/bookit_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Business Info ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BusinessConfig {
    pub name: String,
    pub tagline: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "Tarik Media".to_string(),
            tagline: "Professional Photography & Videography".to_string(),
        }
    }
}

// --- Backend API Location ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Primary backend URL, e.g. `http://localhost:5000/api` or `/api`.
    pub base_url: String,
    /// Tried in order after the primary URL fails its health check.
    pub fallback_urls: Vec<String>,
    /// When false the primary URL is always `base_url`.
    pub auto_detect: bool,
    /// Location of the page hosting the widget; relative URLs resolve against it.
    pub page_url: String,
    /// Port of the local dev page that talks to `local_dev_api_url`.
    pub local_dev_port: u16,
    pub local_dev_api_url: String,
    pub probe_timeout_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            fallback_urls: vec![
                "http://localhost:8002/api".to_string(), // Alternative local port
                "http://127.0.0.1:5000/api".to_string(), // IPv4 localhost
                "/api".to_string(),                      // Same-origin fallback
            ],
            auto_detect: true,
            page_url: "http://localhost:8000/".to_string(),
            local_dev_port: 8001,
            local_dev_api_url: "http://localhost:8002/api".to_string(),
            probe_timeout_ms: 3000,
            request_timeout_secs: 30,
        }
    }
}

// --- Booking Flow ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    /// Shown one after another while a booking is being submitted.
    pub loading_messages: Vec<String>,
    pub progress_interval_ms: u64,
    /// How many days ahead to look for the next available dates.
    pub days_to_check: u32,
    /// IANA zone deciding what "today" is; local time when unset.
    pub time_zone: Option<String>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            loading_messages: vec![
                "Checking your session details...".to_string(),
                "Securing your time slot...".to_string(),
                "Processing your booking...".to_string(),
                "Finalizing your appointment...".to_string(),
                "Almost done, confirming everything...".to_string(),
            ],
            progress_interval_ms: 1600,
            days_to_check: 14,
            time_zone: None,
        }
    }
}

// --- Notifications ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub error_ms: u64,
    pub success_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            error_ms: 5000,
            success_ms: 7000,
        }
    }
}

// --- Third-party Scheduler Embed ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmbedConfig {
    pub url: String,
    /// Only messages from this origin are trusted.
    pub origin: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            url: "https://cal.com/osb.productions/15min".to_string(),
            origin: "https://cal.com".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Enables debug logging.
    pub debug: bool,
    pub business: BusinessConfig,
    pub api: ApiConfig,
    pub booking: BookingConfig,
    pub notifications: NotificationConfig,
    pub embed: EmbedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: true,
            business: BusinessConfig::default(),
            api: ApiConfig::default(),
            booking: BookingConfig::default(),
            notifications: NotificationConfig::default(),
            embed: EmbedConfig::default(),
        }
    }
}
