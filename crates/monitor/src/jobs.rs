//! The job poll cycle: fetch, diff against the snapshot, notify, persist.

use jobwatch_core::{
    parse_job_records, CommandSpec, JobDiff, JobRecordSet, JobsConfig, SnapshotStore,
};
use jobwatch_notify::{JobUpdate, MessageFormatter, Notifier};
use tracing::{debug, info};

use crate::error::Result;
use crate::runner::CommandRunner;

/// What a single job poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobCycle {
    /// Debug mode was on; nothing was run.
    Skipped,
    /// No snapshot existed; the current jobs became the baseline.
    Bootstrapped { jobs: usize },
    /// The job id set matched the snapshot; nothing was sent or written.
    Unchanged { jobs: usize },
    /// Notifications were sent and the snapshot replaced.
    Changed { appeared: usize, disappeared: usize },
}

pub struct JobMonitor {
    runner: Box<dyn CommandRunner>,
    notifier: Box<dyn Notifier>,
    formatter: MessageFormatter,
    store: SnapshotStore,
    command: CommandSpec,
    skip: bool,
}

impl JobMonitor {
    pub fn new(
        runner: Box<dyn CommandRunner>,
        notifier: Box<dyn Notifier>,
        formatter: MessageFormatter,
        store: SnapshotStore,
        command: CommandSpec,
    ) -> Self {
        Self {
            runner,
            notifier,
            formatter,
            store,
            command,
            skip: false,
        }
    }

    pub fn from_config(
        config: &JobsConfig,
        runner: Box<dyn CommandRunner>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        let formatter = MessageFormatter::new(config.message_format)
            .with_template(config.message_template.clone())?;
        let store = SnapshotStore::new(&config.folder, &config.file);

        let mut monitor = Self::new(
            runner,
            notifier,
            formatter,
            store,
            config.status_command.clone(),
        );
        monitor.skip = config.debug;
        Ok(monitor)
    }

    /// Query the scheduler for the current job set.
    pub async fn fetch(&self) -> JobRecordSet {
        let raw = self.runner.run(&self.command, None).await;
        let records = parse_job_records(&raw);
        debug!(jobs = records.len(), "fetched current jobs");
        records
    }

    /// Run one poll cycle.
    ///
    /// The snapshot is only written on the first run or when the job id set
    /// changed, and only after every notification for the change was sent.
    pub async fn run(&self) -> Result<JobCycle> {
        if self.skip {
            info!("debug mode enabled, skipping job poll");
            return Ok(JobCycle::Skipped);
        }

        let Some(previous) = self.store.load()? else {
            let current = self.fetch().await;
            self.store.save(&current)?;
            info!(jobs = current.len(), "recorded initial job snapshot");
            return Ok(JobCycle::Bootstrapped {
                jobs: current.len(),
            });
        };

        let current = self.fetch().await;
        let diff = JobDiff::compute(&current, &previous);
        if diff.is_empty() {
            debug!(jobs = current.len(), "job set unchanged");
            return Ok(JobCycle::Unchanged {
                jobs: current.len(),
            });
        }

        if !diff.appeared.is_empty() {
            self.notify(JobUpdate::New, &diff.appeared).await?;
        }
        if !diff.disappeared.is_empty() {
            self.notify(JobUpdate::Finished, &diff.disappeared).await?;
        }
        self.store.save(&current)?;

        Ok(JobCycle::Changed {
            appeared: diff.appeared.len(),
            disappeared: diff.disappeared.len(),
        })
    }

    async fn notify(&self, update: JobUpdate, records: &JobRecordSet) -> Result<()> {
        let notification = self.formatter.format_jobs(update, records)?;
        self.notifier.send(&notification).await?;
        info!(
            update = update.label(),
            jobs = records.len(),
            channel = self.notifier.channel_name(),
            "sent job update"
        );
        Ok(())
    }
}
