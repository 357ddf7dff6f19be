//! Best-effort outbound webhook notifications.
//!
//! Notifications are side effects of an already-successful operation. They
//! run in a spawned task, never block the primary response, and failures
//! are logged and swallowed. Delivery is at most once.

use crate::config::NotifyConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Payload posted to the notification webhook
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub event: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl NotificationEvent {
    pub fn new(event: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            summary: summary.into(),
            contact_email: None,
        }
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = Some(email.into());
        self
    }
}

/// Fire-and-forget webhook sender
pub struct Notifier {
    http: Client,
    webhook_url: Option<String>,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .unwrap_or_default();

        Self {
            http,
            webhook_url: config.webhook_url.clone(),
        }
    }

    /// Post the event to the configured webhook in a background task.
    /// Returns immediately; an unset URL disables notification silently.
    pub fn send(&self, event: NotificationEvent) {
        let Some(url) = self.webhook_url.clone() else {
            debug!(event = %event.event, "No webhook configured, skipping notification");
            return;
        };

        let http = self.http.clone();
        tokio::spawn(async move {
            match http.post(&url).json(&event).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(event = %event.event, "Notification delivered");
                }
                Ok(response) => {
                    warn!(
                        event = %event.event,
                        status = %response.status(),
                        "Notification webhook rejected the event"
                    );
                }
                Err(e) => {
                    warn!(event = %event.event, error = %e, "Notification webhook unreachable");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_webhook_is_a_noop() {
        let notifier = Notifier::new(&NotifyConfig::default());
        // Must not panic or block
        notifier.send(NotificationEvent::new("contact_message", "New message"));
    }

    #[test]
    fn test_event_serialization_skips_empty_email() {
        let event = NotificationEvent::new("contact_message", "New message");
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("contact_email"));

        let event = event.with_contact_email("maria@example.com");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("maria@example.com"));
    }
}
