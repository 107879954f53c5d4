//! The quota report round: one notification per configured fileset.

use jobwatch_core::{parse_quota_record, CommandSpec, QuotaConfig, QuotaRecord};
use jobwatch_notify::{MessageFormatter, Notifier};
use tracing::{debug, info};

use crate::error::Result;
use crate::runner::CommandRunner;

pub struct QuotaMonitor {
    runner: Box<dyn CommandRunner>,
    notifier: Box<dyn Notifier>,
    formatter: MessageFormatter,
    command: CommandSpec,
    filter: CommandSpec,
    fields: Vec<String>,
    project_ids: Vec<String>,
}

impl QuotaMonitor {
    pub fn from_config(
        config: &QuotaConfig,
        runner: Box<dyn CommandRunner>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            runner,
            notifier,
            formatter: MessageFormatter::new(config.message_format),
            command: config.command.clone(),
            filter: config.filter_command.clone(),
            fields: config.fields.clone(),
            project_ids: config.project_ids.clone(),
        }
    }

    /// Query and parse the quota line for one fileset.
    pub async fn fetch(&self, project_id: &str) -> QuotaRecord {
        let filter = self.filter.with_arg(project_id);
        let raw = self.runner.run(&self.command, Some(&filter)).await;
        let record = parse_quota_record(&raw, self.fields.as_slice());
        if record.is_empty() {
            debug!(project_id, "no quota line found");
        }
        record.with_identifier(project_id)
    }

    /// Report every configured fileset in order, stopping at the first
    /// delivery failure. Returns the number of notifications sent.
    ///
    /// A report is sent even when the quota line was missing or short.
    pub async fn run(&self) -> Result<usize> {
        let mut sent = 0;
        for project_id in &self.project_ids {
            let record = self.fetch(project_id).await;
            let notification = self.formatter.format_quota(&record)?;
            self.notifier.send(&notification).await?;
            info!(
                project_id = %project_id,
                fields = record.len(),
                channel = self.notifier.channel_name(),
                "sent quota report"
            );
            sent += 1;
        }
        Ok(sent)
    }
}
