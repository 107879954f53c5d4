//! Minijinja template rendering for job update messages.
//!
//! Users may replace the built-in text layout with their own template.
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use jobwatch_core::JobRecord;

use crate::traits::NotifyError;

/// Bullet marker placed before every `key: value` line.
pub const BULLET: &str = "⦿";

/// Context data available to message templates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TemplateContext {
    /// Human-readable update label, e.g. `"New Jobs"`.
    pub label: String,
    /// Upper-case update tag, e.g. `"NEW JOBS"`.
    pub update: String,
    /// One entry per job, each a list of fields in column order.
    pub records: Vec<Vec<Field>>,
}

/// A single `key: value` pair of a record.
///
/// Records are passed as lists rather than maps so that templates iterate
/// fields in column order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl TemplateContext {
    pub fn new(label: &str, update: &str, records: &[JobRecord]) -> Self {
        Self {
            label: label.to_string(),
            update: update.to_string(),
            records: records
                .iter()
                .map(|record| {
                    record
                        .iter()
                        .map(|(key, value)| Field {
                            key: key.to_string(),
                            value: value.to_string(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// Renders message templates using minijinja.
#[derive(Debug)]
pub struct TemplateRenderer {
    _private: (),
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Build a minijinja environment with the `bullet` global.
    fn build_env() -> minijinja::Environment<'static> {
        let mut env = minijinja::Environment::new();
        env.add_global("bullet", BULLET);

        env
    }

    /// Render a template string with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is invalid or
    /// rendering fails.
    pub fn render(&self, template_str: &str, ctx: &TemplateContext) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(template_str, ctx)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Validate that a template string parses without errors.
    ///
    /// This does not evaluate the template, it only checks syntax.
    pub fn validate(&self, template_str: &str) -> Result<(), NotifyError> {
        let env = Self::build_env();
        env.template_from_str(template_str)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(())
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
