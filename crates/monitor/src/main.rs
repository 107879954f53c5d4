mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use jobwatch_core::{load_dotenv, JobsConfig, QuotaConfig};
use jobwatch_monitor::{JobCycle, JobMonitor, ProcessRunner, QuotaMonitor};
use jobwatch_notify::{Notifier, WebhookNotifier};

use crate::cli::{CliArgs, Command, Target};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Load the environment first so RUST_LOG from .env is honoured.
    load_dotenv(args.env_file.as_deref()).context("failed to load environment file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    match args.command {
        Command::Jobs => run_jobs().await,
        Command::Quota => run_quota().await,
        Command::TestWebhook { target } => test_webhook(target).await,
    }
}

async fn run_jobs() -> Result<()> {
    let config = JobsConfig::from_env().context("invalid job monitor configuration")?;
    config.log_summary();

    let notifier = WebhookNotifier::new(&config.webhook_url, "jobs")?;
    let monitor = JobMonitor::from_config(&config, Box::new(ProcessRunner), Box::new(notifier))?;

    match monitor.run().await.context("job poll failed")? {
        JobCycle::Skipped => info!(debug = config.debug, "job poll skipped"),
        JobCycle::Bootstrapped { jobs } => info!(jobs, "job baseline created"),
        JobCycle::Unchanged { jobs } => info!(jobs, "no job changes"),
        JobCycle::Changed {
            appeared,
            disappeared,
        } => info!(appeared, disappeared, "job changes reported"),
    }
    Ok(())
}

async fn run_quota() -> Result<()> {
    let config = QuotaConfig::from_env().context("invalid quota monitor configuration")?;
    config.log_summary();

    let notifier = WebhookNotifier::new(&config.webhook_url, "quota")?;
    let monitor = QuotaMonitor::from_config(&config, Box::new(ProcessRunner), Box::new(notifier));

    let sent = monitor.run().await.context("quota report failed")?;
    info!(sent, "quota reports sent");
    Ok(())
}

async fn test_webhook(target: Target) -> Result<()> {
    let notifier = match target {
        Target::Jobs => {
            let config = JobsConfig::from_env().context("invalid job monitor configuration")?;
            WebhookNotifier::new(&config.webhook_url, "jobs")?
        }
        Target::Quota => {
            let config = QuotaConfig::from_env().context("invalid quota monitor configuration")?;
            WebhookNotifier::new(&config.webhook_url, "quota")?
        }
    };

    notifier
        .test()
        .await
        .with_context(|| format!("test notification to {} webhook failed", notifier.channel_name()))?;
    info!(channel = notifier.channel_name(), "test notification delivered");
    Ok(())
}
