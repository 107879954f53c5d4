use std::fs;

use jobwatch_core::{CoreError, JobRecord, MessageFormat, SnapshotStore};
use jobwatch_monitor::{JobCycle, JobMonitor, MonitorError};

use crate::helpers::{jobs_config, squeue_output, FakeRunner, RecordingNotifier};

fn job(id: &str, name: &str) -> JobRecord {
    JobRecord::from_pairs([("JOBID", id), ("NAME", name), ("ST", "R")]).unwrap()
}

struct Harness {
    dir: tempfile::TempDir,
    runner: FakeRunner,
    notifier: RecordingNotifier,
}

impl Harness {
    fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    fn with_notifier(notifier: RecordingNotifier) -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            runner: FakeRunner::default(),
            notifier,
        }
    }

    fn store(&self) -> SnapshotStore {
        SnapshotStore::new(self.dir.path().join("jobs"), "last_updated.json")
    }

    fn monitor(&self) -> JobMonitor {
        self.monitor_with(|_| {})
    }

    fn monitor_with(&self, tweak: impl FnOnce(&mut jobwatch_core::JobsConfig)) -> JobMonitor {
        let mut config = jobs_config(self.dir.path());
        tweak(&mut config);
        JobMonitor::from_config(
            &config,
            Box::new(self.runner.clone()),
            Box::new(self.notifier.clone()),
        )
        .unwrap()
    }

    fn scheduler_reports(&self, jobs: &[(&str, &str)]) {
        self.runner.set_output("squeue --me", &squeue_output(jobs));
    }
}

#[tokio::test]
async fn first_run_records_baseline_without_notifying() {
    let h = Harness::new();
    h.scheduler_reports(&[("1", "train")]);

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(cycle, JobCycle::Bootstrapped { jobs: 1 });
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.store().load().unwrap(), Some(vec![job("1", "train")]));
}

#[tokio::test]
async fn reports_new_and_finished_jobs() {
    let h = Harness::new();
    h.store()
        .save(&vec![job("1", "prep"), job("2", "train")])
        .unwrap();
    h.scheduler_reports(&[("2", "train"), ("3", "eval")]);

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(
        cycle,
        JobCycle::Changed {
            appeared: 1,
            disappeared: 1
        }
    );
    let texts = h.notifier.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(
        texts[0],
        "🔉 Update: New Jobs\n\n⦿ JOBID: 3\n⦿ NAME: eval\n⦿ ST: R\n"
    );
    assert_eq!(
        texts[1],
        "🔉 Update: Finished Jobs\n\n⦿ JOBID: 1\n⦿ NAME: prep\n⦿ ST: R\n"
    );
    assert_eq!(
        h.store().load().unwrap(),
        Some(vec![job("2", "train"), job("3", "eval")])
    );
}

#[tokio::test]
async fn unchanged_job_set_sends_nothing_and_keeps_snapshot() {
    let h = Harness::new();
    h.store()
        .save(&vec![job("1", "prep"), job("2", "train")])
        .unwrap();
    let before = fs::read_to_string(h.store().path()).unwrap();
    let modified = fs::metadata(h.store().path()).unwrap().modified().unwrap();

    // Same ids, different order and state.
    h.runner
        .set_output("squeue --me", "JOBID NAME ST\n2 train CG\n1 prep R\n");

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(cycle, JobCycle::Unchanged { jobs: 2 });
    assert!(h.notifier.sent().is_empty());
    assert_eq!(fs::read_to_string(h.store().path()).unwrap(), before);
    assert_eq!(
        fs::metadata(h.store().path()).unwrap().modified().unwrap(),
        modified
    );
}

#[tokio::test]
async fn only_new_jobs_sends_one_notification() {
    let h = Harness::new();
    h.store().save(&vec![job("1", "prep")]).unwrap();
    h.scheduler_reports(&[("1", "prep"), ("5", "a"), ("4", "b")]);

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(
        cycle,
        JobCycle::Changed {
            appeared: 2,
            disappeared: 0
        }
    );
    let texts = h.notifier.texts();
    assert_eq!(texts.len(), 1);
    let five = texts[0].find("⦿ JOBID: 5").unwrap();
    let four = texts[0].find("⦿ JOBID: 4").unwrap();
    assert!(five < four, "records keep scheduler order");
}

#[tokio::test]
async fn empty_snapshot_is_a_baseline() {
    let h = Harness::new();
    h.store().save(&Vec::new()).unwrap();
    h.scheduler_reports(&[("9", "train")]);

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(
        cycle,
        JobCycle::Changed {
            appeared: 1,
            disappeared: 0
        }
    );
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn failed_status_command_reports_all_jobs_finished() {
    let h = Harness::new();
    h.store().save(&vec![job("1", "prep")]).unwrap();
    // No output registered: the command "failed" and printed nothing.

    let cycle = h.monitor().run().await.unwrap();

    assert_eq!(
        cycle,
        JobCycle::Changed {
            appeared: 0,
            disappeared: 1
        }
    );
    assert!(h.notifier.texts()[0].starts_with("🔉 Update: Finished Jobs"));
    assert_eq!(h.store().load().unwrap(), Some(Vec::new()));
}

#[tokio::test]
async fn corrupt_snapshot_aborts_before_polling() {
    let h = Harness::new();
    fs::create_dir_all(h.dir.path().join("jobs")).unwrap();
    fs::write(h.store().path(), "not json").unwrap();
    h.scheduler_reports(&[("1", "train")]);

    let result = h.monitor().run().await;

    assert!(matches!(
        result,
        Err(MonitorError::Core(CoreError::SnapshotCorrupt { .. }))
    ));
    assert!(h.runner.calls().is_empty());
    assert!(h.notifier.sent().is_empty());
    assert_eq!(fs::read_to_string(h.store().path()).unwrap(), "not json");
}

#[tokio::test]
async fn delivery_failure_leaves_snapshot_untouched() {
    let h = Harness::with_notifier(RecordingNotifier::failing());
    h.store().save(&vec![job("1", "prep")]).unwrap();
    h.scheduler_reports(&[("2", "train")]);

    let result = h.monitor().run().await;

    assert!(matches!(result, Err(MonitorError::Notify(_))));
    assert_eq!(h.store().load().unwrap(), Some(vec![job("1", "prep")]));
}

#[tokio::test]
async fn debug_mode_skips_the_cycle() {
    let h = Harness::new();
    h.scheduler_reports(&[("1", "train")]);

    let cycle = h.monitor_with(|c| c.debug = true).run().await.unwrap();

    assert_eq!(cycle, JobCycle::Skipped);
    assert!(h.runner.calls().is_empty());
    assert!(!h.dir.path().join("jobs").exists());
}

#[tokio::test]
async fn structured_format_sends_update_and_records() {
    let h = Harness::new();
    h.store().save(&vec![job("1", "prep")]).unwrap();
    h.scheduler_reports(&[("2", "train")]);

    h.monitor_with(|c| c.message_format = MessageFormat::Structured)
        .run()
        .await
        .unwrap();

    let payloads: Vec<serde_json::Value> = h
        .notifier
        .sent()
        .iter()
        .map(|n| serde_json::to_value(n).unwrap())
        .collect();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0]["update"], "NEW JOBS");
    assert_eq!(payloads[0]["jobs"][0]["JOBID"], "2");
    assert_eq!(payloads[1]["update"], "FINISHED JOBS");
    assert_eq!(payloads[1]["jobs"][0]["NAME"], "prep");
}

#[tokio::test]
async fn template_overrides_text_layout() {
    let h = Harness::new();
    h.store().save(&vec![job("1", "prep")]).unwrap();
    h.scheduler_reports(&[("1", "prep"), ("2", "train")]);

    h.monitor_with(|c| {
        c.message_template =
            Some("{{ label }}:{% for r in records %} {{ r[0].value }}{% endfor %}".to_string())
    })
    .run()
    .await
    .unwrap();

    assert_eq!(h.notifier.texts(), vec!["New Jobs: 2".to_string()]);
}
