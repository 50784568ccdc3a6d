//! Webhook notifications.
//!
//! Delivery is best-effort: failures are logged and reported to the caller as
//! a `Delivery` value, never propagated as errors.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{MonitorConfig, MAX_MESSAGE_LEN, WEBHOOK_SUCCESS_STATUS};
use crate::error::NotifyError;
use crate::http::{send_with_tls_fallback, HttpRequest, Transport};
use crate::utils::truncate_chars;

/// Longest slice of a webhook error body kept in logs.
const MAX_LOGGED_BODY: usize = 200;

/// Result of one notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Delivery {
    Delivered,
    NotDelivered(NotifyError),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered)
    }
}

/// Anything that can carry a message to the user.
pub trait Notify {
    fn notify(&self, message: &str) -> Delivery;
}

impl<N: Notify + ?Sized> Notify for &N {
    fn notify(&self, message: &str) -> Delivery {
        (**self).notify(message)
    }
}

/// JSON body posted to the webhook.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

/// Posts messages to a chat webhook.
pub struct Notifier<T> {
    transport: T,
    webhook_url: String,
    username: String,
    timeout: Duration,
}

impl<T: Transport> Notifier<T> {
    pub fn new(transport: T, config: &MonitorConfig) -> Self {
        Self {
            transport,
            webhook_url: config.webhook_url.clone(),
            username: config.webhook_username.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Post `message`, succeeding only on 204 No Content.
    pub fn send(&self, message: &str) -> Result<(), NotifyError> {
        let content = truncate_chars(message, MAX_MESSAGE_LEN);
        let payload = WebhookPayload {
            content: &content,
            username: &self.username,
        };
        // Serializing two string fields cannot fail
        let body = serde_json::to_value(&payload).unwrap_or_default();
        let request = HttpRequest::post_json(&self.webhook_url, body, self.timeout);

        let response = send_with_tls_fallback(&self.transport, &request)?;
        if response.status != WEBHOOK_SUCCESS_STATUS {
            return Err(NotifyError::UnexpectedStatus {
                status: response.status,
                body: truncate_chars(&response.body, MAX_LOGGED_BODY),
            });
        }
        Ok(())
    }
}

impl<T: Transport> Notify for Notifier<T> {
    fn notify(&self, message: &str) -> Delivery {
        match self.send(message) {
            Ok(()) => {
                info!("Webhook alert sent");
                Delivery::Delivered
            }
            Err(e) => {
                warn!(error = %e, "Failed to send webhook alert");
                Delivery::NotDelivered(e)
            }
        }
    }
}
