//! Notification delivery for job and quota updates.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification transports
//! - `MessageFormatter` rendering records as text or structured payloads
//! - Minijinja rendering for user-supplied text templates
//! - Webhook notifier posting payloads over HTTP

pub mod formatter;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use formatter::{JobUpdate, MessageFormatter};
pub use traits::{Notification, Notifier, NotifyError};
pub use webhook::WebhookNotifier;
