use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Watch cluster jobs and disk quota, reporting changes to a webhook.
///
/// Each invocation runs a single cycle and exits; schedule it externally
/// (e.g. with cron).
#[derive(Parser, Debug)]
#[command(name = "jobwatch", version, about = "Report scheduler job changes and disk quota to a webhook")]
pub struct CliArgs {
    /// Path to a dotenv file (default: ./.env when present)
    #[arg(long, global = true, env = "JOBWATCH_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll the scheduler once and report new and finished jobs
    Jobs,

    /// Send one quota report per configured fileset
    Quota,

    /// Send a test message to a configured webhook
    TestWebhook {
        #[arg(value_enum)]
        target: Target,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Jobs,
    Quota,
}
