//! Notifier trait definition and shared error types.

/// Errors that can occur while building or delivering a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Failed to serialize payload: {0}")]
    Serialize(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A rendered payload ready for delivery.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Notification {
    /// Preformatted message, delivered as `{"text": ...}`.
    Text { text: String },
    /// Update label plus raw records, delivered as-is.
    Structured(serde_json::Value),
}

impl Notification {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The message text, for text notifications.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Structured(_) => None,
        }
    }
}

/// Trait for notification transport implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Test connectivity with a sample notification.
    async fn test(&self) -> Result<(), NotifyError> {
        self.send(&Notification::text(
            "🔉 jobwatch test notification: this webhook is reachable.",
        ))
        .await
    }

    /// Human-readable name for this channel (e.g., "webhook").
    fn channel_name(&self) -> &str;
}
