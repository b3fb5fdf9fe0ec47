// --- File: crates/bookit_common/src/error.rs ---
//! Host-facing error type.
//!
//! The widget recovers most failures itself and only hands a host the ones it
//! cannot: startup without a backend, a client that cannot be built, a config
//! that does not load. Those arrive as [`BookitError`].

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookitError {
    /// The backend could not be reached at all
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The backend answered with something we could not read
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The visitor's input was rejected
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The backend answered, but not with what we asked for
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The slot was taken by someone else
    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Attaches a description of the failed step to any error.
pub trait Context<T, E> {
    fn context<C>(self, context: C) -> Result<T, BookitError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Like [`Context::context`], but only builds the description on failure.
    fn with_context<C, F>(self, f: F) -> Result<T, BookitError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BookitError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BookitError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, BookitError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| BookitError::InternalError(format!("{}: {}", f(), error)))
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> BookitError {
    BookitError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> BookitError {
    BookitError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> BookitError {
    BookitError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> BookitError {
    BookitError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> BookitError {
    BookitError::InternalError(message.to_string())
}
