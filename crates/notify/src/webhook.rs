//! HTTP webhook notifier.
//!
//! Delivers notifications as JSON payloads to a configured webhook URL
//! (Slack incoming or workflow webhooks). One request per notification,
//! no retries.

use crate::traits::{Notification, Notifier, NotifyError};

/// Posts notifications as JSON to a configured endpoint.
#[derive(Debug)]
pub struct WebhookNotifier {
    /// Target URL.
    url: reqwest::Url,
    /// Name used in logs, e.g. `"jobs"` or `"quota"`.
    channel: String,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a new webhook notifier.
    ///
    /// An unparseable URL produces a [`NotifyError::Config`] error.
    pub fn new(url: &str, channel: impl Into<String>) -> Result<Self, NotifyError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| NotifyError::Config(format!("invalid webhook URL: {e}")))?;

        Ok(Self {
            url,
            channel: channel.into(),
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    /// POST the notification as a JSON body to the webhook URL.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(notification)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                channel = %self.channel,
                %status,
                body = %body_text,
                "webhook returned non-2xx status"
            );
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        tracing::debug!(
            channel = %self.channel,
            status = %status,
            "webhook notification delivered"
        );

        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.channel
    }
}
