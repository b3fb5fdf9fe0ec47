// --- File: crates/bookit_common/src/lib.rs ---

// Declare modules within this crate
pub mod models;    // Wire data structures shared with the backend
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod services;  // Service abstractions
pub mod logging;   // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    BookitError,
    Context,
    config_error,
    validation_error,
    conflict,
    external_service_error,
    internal_error,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, default_client};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level, init_from_debug_flag, log_result};

pub use services::{ApiError, BookingApi};

// This crate provides common functionality shared by the widget core and its hosts.
// It includes the wire models, error handling, HTTP client setup and the backend service trait.
