//! Renders job and quota records into webhook payloads.
//!
//! The payload shape is a strategy chosen by configuration: preformatted
//! text for Slack incoming webhooks, or the update label plus raw records
//! for Slack workflow webhooks.

use jobwatch_core::{JobRecord, MessageFormat, QuotaRecord};
use serde_json::json;

use crate::templating::{TemplateContext, TemplateRenderer, BULLET};
use crate::traits::{Notification, NotifyError};

const HEADER_MARKER: &str = "🔉";

/// Category of a job notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobUpdate {
    New,
    Finished,
}

impl JobUpdate {
    /// Label used in the text header.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New Jobs",
            Self::Finished => "Finished Jobs",
        }
    }

    /// Tag used in structured payloads.
    pub fn tag(self) -> &'static str {
        match self {
            Self::New => "NEW JOBS",
            Self::Finished => "FINISHED JOBS",
        }
    }
}

#[derive(Debug)]
pub struct MessageFormatter {
    format: MessageFormat,
    template: Option<String>,
    renderer: TemplateRenderer,
}

impl MessageFormatter {
    pub fn new(format: MessageFormat) -> Self {
        Self {
            format,
            template: None,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Use `template` instead of the built-in text layout for job updates.
    ///
    /// The template is validated up front. It only applies to the text
    /// format; structured payloads carry the records verbatim.
    pub fn with_template(mut self, template: Option<String>) -> Result<Self, NotifyError> {
        if let Some(ref tmpl) = template {
            self.renderer
                .validate(tmpl)
                .map_err(|e| NotifyError::Config(format!("invalid message template: {e}")))?;
            if self.format == MessageFormat::Structured {
                tracing::warn!("message template is ignored for structured payloads");
            }
        }
        self.template = template;
        Ok(self)
    }

    /// Build the notification announcing `records` under `update`.
    pub fn format_jobs(
        &self,
        update: JobUpdate,
        records: &[JobRecord],
    ) -> Result<Notification, NotifyError> {
        match self.format {
            MessageFormat::Text => {
                let text = match &self.template {
                    Some(tmpl) => {
                        let ctx = TemplateContext::new(update.label(), update.tag(), records);
                        self.renderer.render(tmpl, &ctx)?
                    }
                    None => render_job_text(update.label(), records),
                };
                Ok(Notification::text(text))
            }
            MessageFormat::Structured => {
                let jobs = serde_json::to_value(records)
                    .map_err(|e| NotifyError::Serialize(e.to_string()))?;
                Ok(Notification::Structured(json!({
                    "update": update.tag(),
                    "jobs": jobs,
                })))
            }
        }
    }

    /// Build the notification reporting one quota record.
    pub fn format_quota(&self, record: &QuotaRecord) -> Result<Notification, NotifyError> {
        match self.format {
            MessageFormat::Text => {
                let mut text = String::new();
                push_fields(&mut text, record.iter());
                Ok(Notification::text(text))
            }
            MessageFormat::Structured => {
                let quota = serde_json::to_value(record)
                    .map_err(|e| NotifyError::Serialize(e.to_string()))?;
                Ok(Notification::Structured(json!({
                    "update": "QUOTA",
                    "quota": quota,
                })))
            }
        }
    }
}

/// Built-in text layout: a header line, then one blank-line separated
/// block of bullet lines per record.
pub fn render_job_text(label: &str, records: &[JobRecord]) -> String {
    let mut text = format!("{HEADER_MARKER} Update: {label}\n");
    for record in records {
        text.push('\n');
        push_fields(&mut text, record.iter());
    }
    text
}

fn push_fields<'a>(out: &mut String, fields: impl Iterator<Item = (&'a str, &'a str)>) {
    for (key, value) in fields {
        out.push_str(&format!("{BULLET} {key}: {value}\n"));
    }
}
