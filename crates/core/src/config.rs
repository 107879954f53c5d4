use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::parser::DEFAULT_QUOTA_FIELDS;

/// Load a `.env` file.
///
/// With no explicit path a missing `.env` is silently ignored. An explicit
/// path that cannot be loaded is a configuration error.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => dotenvy::from_path(p)
            .map(|_| ())
            .map_err(|e| CoreError::Config(format!("failed to load {}: {e}", p.display()))),
        None => {
            dotenvy::dotenv().ok();
            Ok(())
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Typed access to a key/value source (the process environment in
/// production, a map in tests).
struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn opt(&self, key: &str) -> Option<String> {
        self.raw(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.opt(key)
            .ok_or_else(|| CoreError::Config(format!("{key} is not set")))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.opt(key) {
            None => Ok(default),
            Some(v) => parse_bool(&v)
                .ok_or_else(|| CoreError::Config(format!("{key} must be true or false, got {v:?}"))),
        }
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr<Err = CoreError>,
    {
        match self.opt(key) {
            None => Ok(default),
            Some(v) => v.parse().map_err(|e| match e {
                CoreError::Config(msg) => CoreError::Config(format!("{key}: {msg}")),
                other => other,
            }),
        }
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.opt(key).map(|v| split_list(&v))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Shared types ──────────────────────────────────────────────

/// Payload shape sent to the webhook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    /// Preformatted text for a Slack incoming webhook.
    #[default]
    Text,
    /// Update label plus raw records, for a Slack workflow webhook.
    Structured,
}

impl FromStr for MessageFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "structured" | "json" => Ok(Self::Structured),
            other => Err(CoreError::Config(format!(
                "unknown message format {other:?} (expected text or structured)"
            ))),
        }
    }
}

/// An external program and its fixed arguments, spawned without a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Return a copy with `arg` appended.
    pub fn with_arg(&self, arg: impl Into<String>) -> Self {
        let mut spec = self.clone();
        spec.args.push(arg.into());
        spec
    }
}

impl FromStr for CommandSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CoreError::Config("command is empty".to_string()))?;
        Ok(Self::new(program, parts))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ── Job monitor ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    pub webhook_url: String,
    /// When set, the poll cycle is skipped entirely.
    pub debug: bool,
    pub folder: PathBuf,
    pub file: String,
    pub status_command: CommandSpec,
    pub message_format: MessageFormat,
    /// Optional minijinja template overriding the built-in text layout.
    pub message_template: Option<String>,
}

impl JobsConfig {
    /// Build from the process environment (call [`load_dotenv`] first).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let vars = Vars { lookup };
        Ok(Self {
            webhook_url: vars.required("SLACK_JOB_WEBHOOK")?,
            debug: vars.bool_or("ENABLE_JOB_DEBUG_MODE", false)?,
            folder: PathBuf::from(vars.or("JOB_FOLDER", "jobs")),
            file: vars.or("JOB_FILE", "last_updated.json"),
            status_command: vars.or("JOB_STATUS_COMMAND", "squeue --me").parse()?,
            message_format: vars.parse_or("JOB_MESSAGE_FORMAT", MessageFormat::Text)?,
            message_template: vars.raw("JOB_MESSAGE_TEMPLATE"),
        })
    }

    pub fn log_summary(&self) {
        tracing::info!(
            folder = %self.folder.display(),
            file = %self.file,
            command = %self.status_command,
            format = ?self.message_format,
            template = self.message_template.is_some(),
            debug = self.debug,
            "job monitor config loaded"
        );
    }
}

// ── Quota monitor ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    pub webhook_url: String,
    /// Project / fileset identifiers reported on, in order.
    pub project_ids: Vec<String>,
    pub command: CommandSpec,
    /// Filter the quota output is piped through; the identifier is appended.
    pub filter_command: CommandSpec,
    pub fields: Vec<String>,
    pub message_format: MessageFormat,
}

impl QuotaConfig {
    /// Build from the process environment (call [`load_dotenv`] first).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let vars = Vars { lookup };
        let project_ids = split_list(&vars.required("PROJECT_IDS")?);
        if project_ids.is_empty() {
            return Err(CoreError::Config(
                "PROJECT_IDS contains no identifiers".to_string(),
            ));
        }
        let fields = match vars.list("QUOTA_FIELDS") {
            None => DEFAULT_QUOTA_FIELDS.iter().map(|s| s.to_string()).collect(),
            Some(f) if f.is_empty() => {
                return Err(CoreError::Config(
                    "QUOTA_FIELDS contains no field names".to_string(),
                ));
            }
            Some(f) => f,
        };

        Ok(Self {
            webhook_url: vars.required("SLACK_QUOTA_WEBHOOK")?,
            project_ids,
            command: vars.or("QUOTA_COMMAND", "rquota").parse()?,
            filter_command: vars.or("QUOTA_FILTER_COMMAND", "grep").parse()?,
            fields,
            message_format: vars.parse_or("QUOTA_MESSAGE_FORMAT", MessageFormat::Text)?,
        })
    }

    pub fn log_summary(&self) {
        tracing::info!(
            projects = self.project_ids.len(),
            command = %self.command,
            filter = %self.filter_command,
            format = ?self.message_format,
            "quota monitor config loaded"
        );
    }
}
