// --- File: crates/bookit_common/src/http/client.rs ---
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for backend requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every backend request.
pub const USER_AGENT: &str = concat!("bookit/", env!("CARGO_PKG_VERSION"));

/// Creates a client for talking to the booking backend.
///
/// Every request asks for JSON and identifies itself as the widget. Individual
/// requests may tighten the timeout (the health probe does).
///
/// # Arguments
///
/// * `timeout_secs` - Upper bound for a whole request, response body included
/// * `follow_redirects` - Whether the client should follow redirects
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, ReqwestError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::limited(5)
        } else {
            reqwest::redirect::Policy::none()
        })
        .build()
}

/// A client with the default timeout that follows redirects.
pub fn default_client() -> Result<Client, ReqwestError> {
    create_client(DEFAULT_TIMEOUT_SECS, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_build_with_and_without_redirects() {
        assert!(create_client(5, true).is_ok());
        assert!(create_client(5, false).is_ok());
        assert!(default_client().is_ok());
        assert!(USER_AGENT.starts_with("bookit/"));
    }
}
