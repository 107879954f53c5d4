use jobwatch_core::MessageFormat;
use jobwatch_monitor::{MonitorError, QuotaMonitor};

use crate::helpers::{quota_config, FakeRunner, RecordingNotifier};

const RQUOTA_OUTPUT: &str = "\
projA 100 150 200 none 10 20 30 none
projB 5 150 200 none 1 20 30 none
";

fn monitor(
    project_ids: &[&str],
    runner: &FakeRunner,
    notifier: &RecordingNotifier,
    format: MessageFormat,
) -> QuotaMonitor {
    let mut config = quota_config(project_ids);
    config.message_format = format;
    QuotaMonitor::from_config(&config, Box::new(runner.clone()), Box::new(notifier.clone()))
}

#[tokio::test]
async fn sends_one_report_per_fileset_in_order() {
    let runner = FakeRunner::default();
    runner.set_output("rquota", RQUOTA_OUTPUT);
    let notifier = RecordingNotifier::default();

    let sent = monitor(&["projA", "projB"], &runner, &notifier, MessageFormat::Text)
        .run()
        .await
        .unwrap();

    assert_eq!(sent, 2);
    assert_eq!(
        runner.calls(),
        vec!["rquota | grep projA", "rquota | grep projB"]
    );
    let texts = notifier.texts();
    assert!(texts[0].starts_with("⦿ FileSet: projA\n⦿ Name: projA\n⦿ Blocks: 100\n"));
    assert!(texts[1].contains("⦿ Blocks: 5\n"));
    assert!(texts[1].ends_with("⦿ FileGrace: none\n"));
}

#[tokio::test]
async fn report_contains_fileset_and_parsed_fields() {
    let runner = FakeRunner::default();
    runner.set_output("rquota", "projA 100 150 200\n");
    let notifier = RecordingNotifier::default();

    monitor(&["projA"], &runner, &notifier, MessageFormat::Text)
        .run()
        .await
        .unwrap();

    let text = &notifier.texts()[0];
    assert!(text.contains("FileSet: projA"));
    assert!(text.contains("Blocks: 100"));
    assert!(text.contains("Limit: 200"));
}

#[tokio::test]
async fn missing_quota_line_still_reports() {
    let runner = FakeRunner::default();
    runner.set_output("rquota", RQUOTA_OUTPUT);
    let notifier = RecordingNotifier::default();

    let sent = monitor(&["projZ"], &runner, &notifier, MessageFormat::Text)
        .run()
        .await
        .unwrap();

    assert_eq!(sent, 1);
    assert_eq!(notifier.texts(), vec!["⦿ FileSet: projZ\n".to_string()]);
}

#[tokio::test]
async fn structured_quota_payload() {
    let runner = FakeRunner::default();
    runner.set_output("rquota", RQUOTA_OUTPUT);
    let notifier = RecordingNotifier::default();

    monitor(&["projB"], &runner, &notifier, MessageFormat::Structured)
        .run()
        .await
        .unwrap();

    let payload = serde_json::to_value(&notifier.sent()[0]).unwrap();
    assert_eq!(payload["update"], "QUOTA");
    assert_eq!(payload["quota"]["FileSet"], "projB");
    assert_eq!(payload["quota"]["Files"], "1");
}

#[tokio::test]
async fn delivery_failure_stops_the_round() {
    let runner = FakeRunner::default();
    runner.set_output("rquota", RQUOTA_OUTPUT);
    let notifier = RecordingNotifier::failing();

    let result = monitor(&["projA", "projB"], &runner, &notifier, MessageFormat::Text)
        .run()
        .await;

    assert!(matches!(result, Err(MonitorError::Notify(_))));
    assert_eq!(runner.calls().len(), 1);
}
