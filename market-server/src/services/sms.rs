//! SMS notification service
//!
//! Buyer notifications are a best-effort side effect: failures are logged and
//! swallowed, and senders never block or roll back the calling operation.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS gateway request failed: {0}")]
    Gateway(String),
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    to: &'a str,
    message: &'a str,
}

/// Outbound SMS sender
///
/// Posts `{ to, message }` to the configured gateway with a short timeout.
/// Without a configured gateway (development, tests) messages are logged
/// only.
#[derive(Clone)]
pub struct SmsService {
    client: reqwest::Client,
    gateway_url: Option<String>,
}

impl SmsService {
    pub fn new(gateway_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url,
        }
    }

    /// Send one SMS, returning the gateway outcome
    pub async fn send(&self, phone: &str, message: &str) -> Result<(), SmsError> {
        let Some(url) = &self.gateway_url else {
            tracing::debug!(target: "sms", %phone, %message, "SMS gateway not configured, message logged only");
            return Ok(());
        };

        self.client
            .post(url)
            .timeout(Duration::from_secs(5))
            .json(&SmsPayload { to: phone, message })
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| SmsError::Gateway(e.to_string()))?;

        Ok(())
    }

    /// Fire-and-forget send; the owning request never waits on or fails from
    /// the notification
    pub fn send_best_effort(&self, phone: String, message: String) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send(&phone, &message).await {
                tracing::warn!(target: "sms", error = %e, %phone, "Order notification failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_gateway_succeeds() {
        let service = SmsService::new(None);
        assert!(service.send("+254700000000", "hello").await.is_ok());
    }

    #[tokio::test]
    async fn test_send_to_unreachable_gateway_fails() {
        let service = SmsService::new(Some("http://127.0.0.1:1/sms".to_string()));
        assert!(service.send("+254700000000", "hello").await.is_err());
    }
}
