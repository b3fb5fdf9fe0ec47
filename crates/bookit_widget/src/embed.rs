// --- File: crates/bookit_widget/src/embed.rs ---
//! Bridge to the third-party scheduler embed.
//!
//! The embed itself is an iframe the host loads from `url`. The widget
//! listens to its `booking_confirmed` message and reports frames that fail
//! to load.

use bookit_config::EmbedConfig;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::notify::{FeedbackSurface, Lifetime, NotificationId, NotificationKind};

pub const BOOKING_CONFIRMED: &str = "booking_confirmed";

pub const LOAD_ERROR_MESSAGE: &str = "Booking Calendar Unavailable. We're having trouble loading the \
     booking calendar. Please try refreshing the page or contact us directly.";

/// A message posted by the embedded frame.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedMessage {
    pub origin: String,
    #[serde(default)]
    pub data: Value,
}

impl EmbedMessage {
    pub fn message_type(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerEmbed {
    url: String,
    origin: String,
    business_name: String,
}

impl SchedulerEmbed {
    pub fn new(config: &EmbedConfig, business_name: impl Into<String>) -> Self {
        Self {
            url: config.url.clone(),
            origin: config.origin.clone(),
            business_name: business_name.into(),
        }
    }

    /// Address the host loads into the frame.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if the message came from the trusted origin and
    /// confirmed a booking, in which case a success notification is shown.
    pub fn handle_message(&self, message: &EmbedMessage, surface: &dyn FeedbackSurface) -> bool {
        if message.origin != self.origin {
            debug!("Ignoring embed message from untrusted origin {}", message.origin);
            return false;
        }
        debug!("Scheduler event: {}", message.data);
        if message.message_type() != Some(BOOKING_CONFIRMED) {
            return false;
        }

        info!("Scheduler embed confirmed a booking");
        surface.notify(
            NotificationKind::Success,
            &format!(
                "Booking Confirmed! Thank you for booking with {}. We'll be in touch soon!",
                self.business_name
            ),
            Lifetime::Default,
        );
        true
    }

    /// Called by the host when the frame fails to load. The notice stays
    /// until [`SchedulerEmbed::retry`] is called with the returned id.
    pub fn handle_load_error(&self, surface: &dyn FeedbackSurface) -> NotificationId {
        error!("Failed to load the scheduler embed from {}", self.url);
        surface.notify(NotificationKind::Error, LOAD_ERROR_MESSAGE, Lifetime::Persistent)
    }

    /// Clears the load-error notice and hands back the address to reload.
    pub fn retry(&self, surface: &dyn FeedbackSurface, notice: NotificationId) -> &str {
        surface.dismiss(notice);
        info!("Retrying the scheduler embed");
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationCenter;
    use serde_json::json;

    fn embed() -> SchedulerEmbed {
        SchedulerEmbed::new(&EmbedConfig::default(), "OSB Productions")
    }

    fn message(origin: &str, data: Value) -> EmbedMessage {
        EmbedMessage {
            origin: origin.to_string(),
            data,
        }
    }

    #[test]
    fn test_confirmation_from_trusted_origin_notifies() {
        let center = NotificationCenter::default();
        let handled = embed().handle_message(
            &message("https://cal.com", json!({"type": "booking_confirmed"})),
            &center,
        );

        assert!(handled);
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Success);
        assert!(active[0].message.starts_with("Booking Confirmed!"));
        assert!(active[0].message.contains("OSB Productions"));
    }

    #[test]
    fn test_other_messages_are_ignored() {
        let center = NotificationCenter::default();
        let embed = embed();

        assert!(!embed.handle_message(
            &message("https://evil.example", json!({"type": "booking_confirmed"})),
            &center
        ));
        assert!(!embed.handle_message(
            &message("https://cal.com", json!({"type": "resize", "height": 900})),
            &center
        ));
        assert!(!embed.handle_message(&message("https://cal.com", Value::Null), &center));
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_error_persists_until_retry() {
        let center = NotificationCenter::default();
        let embed = embed();

        let notice = embed.handle_load_error(&center);
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, NotificationKind::Error);
        assert!(active[0].message.starts_with("Booking Calendar Unavailable."));

        assert_eq!(embed.retry(&center, notice), "https://cal.com/osb.productions/15min");
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_message_deserializes_without_data() {
        let parsed: EmbedMessage = serde_json::from_str(r#"{"origin": "https://cal.com"}"#).unwrap();
        assert_eq!(parsed.message_type(), None);
        assert_eq!(embed().url(), "https://cal.com/osb.productions/15min");
    }
}
