use bfclient::constants::{APP_NAME, ELEVATION_PROMPT, RESTART_PROMPT};
use bfclient::test_utils::{MockFeed, RecordingProcess, ScriptedDialogs, init_test_logging};
use bfclient::updater::{DeclinedAt, Resolution, UpdateChecker};
use tempfile::TempDir;

struct Harness {
    _temp: TempDir,
    checker: UpdateChecker<MockFeed, ScriptedDialogs, RecordingProcess>,
}

fn harness(feed: MockFeed, answers: &[bool]) -> Harness {
    init_test_logging(None);
    let temp = TempDir::new().unwrap();
    let checker = UpdateChecker::new(feed, ScriptedDialogs::answering(answers), RecordingProcess::default())
        .diagnostic_log(temp.path().join("report.log"));
    Harness {
        _temp: temp,
        checker,
    }
}

#[tokio::test]
async fn test_no_pending_releases_shows_no_dialog() {
    let feed = MockFeed::with_pending(0);
    let counters = feed.counters();
    let mut h = harness(feed, &[]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    assert!(!outcome.has_updates);
    assert_eq!(outcome.pending_release_count, 0);
    assert!(outcome.message.is_none());
    assert_eq!(outcome.resolution, Resolution::NoUpdate);
    assert!(h.checker.dialogs().shown().is_empty());
    assert_eq!(counters.connected(), 1);
    assert_eq!(counters.released(), 1);
    assert_eq!(counters.applied(), 0);
}

#[tokio::test]
async fn test_three_pending_releases_message() {
    let mut h = harness(MockFeed::with_pending(3), &[false]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    let message = outcome.message.as_deref().unwrap();
    assert!(message.contains("3 versions"));
    assert!(message.contains("Beta Fortress Client is 3 versions behind."));
    assert_eq!(h.checker.dialogs().shown()[0].title, APP_NAME);
    assert_eq!(h.checker.dialogs().confirmations(), vec![message]);
}

#[tokio::test]
async fn test_single_pending_release_is_singular() {
    let mut h = harness(MockFeed::with_pending(1), &[false]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    let message = outcome.message.unwrap();
    assert!(message.contains("1 version behind"));
    assert!(!message.contains("versions"));
}

#[tokio::test]
async fn test_declining_update_skips_elevation_and_apply() {
    let feed = MockFeed::with_pending(2);
    let counters = feed.counters();
    let mut h = harness(feed, &[false]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    // The update was found even though the user declined it.
    assert!(outcome.has_updates);
    assert_eq!(outcome.resolution, Resolution::Declined(DeclinedAt::Update));
    assert_eq!(h.checker.dialogs().confirmations().len(), 1);
    assert_eq!(counters.applied(), 0);
    assert_eq!(counters.released(), 1);
}

#[tokio::test]
async fn test_declining_elevation_skips_apply() {
    let feed = MockFeed::with_pending(2);
    let counters = feed.counters();
    let mut h = harness(feed, &[true, false]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    assert_eq!(outcome.resolution, Resolution::Declined(DeclinedAt::Elevation));
    assert_eq!(h.checker.dialogs().confirmations()[1], ELEVATION_PROMPT);
    assert_eq!(counters.applied(), 0);
}

#[tokio::test]
async fn test_declining_restart_keeps_process_running() {
    let feed = MockFeed::with_pending(2);
    let counters = feed.counters();
    let mut h = harness(feed, &[true, true, false]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    assert_eq!(outcome.resolution, Resolution::Later);
    assert_eq!(outcome.installed_version.as_deref(), Some("1.0.2"));
    assert_eq!(h.checker.dialogs().confirmations()[2], RESTART_PROMPT);
    assert_eq!(counters.applied(), 1);
    assert_eq!(h.checker.process().restarts(), 0);
    assert!(h.checker.process().exits().is_empty());
}

#[tokio::test]
async fn test_accepting_restart_restarts_then_exits() {
    let feed = MockFeed::with_pending(1);
    let counters = feed.counters();
    let mut h = harness(feed, &[true, true, true]);

    let outcome = h.checker.check_for_updates().await.unwrap();

    assert_eq!(outcome.resolution, Resolution::Restarting);
    assert_eq!(h.checker.process().restarts(), 1);
    assert_eq!(h.checker.process().exits(), vec![0]);
    // Session is released before the process is told to exit.
    assert_eq!(counters.released(), 1);
    assert!(!h.checker.diagnostic_log_path().exists());
}

#[tokio::test]
async fn test_checks_can_run_repeatedly() {
    let feed = MockFeed::with_pending(0);
    let counters = feed.counters();
    let mut h = harness(feed, &[]);

    for _ in 0..3 {
        let outcome = h.checker.check_for_updates().await.unwrap();
        assert_eq!(outcome.resolution, Resolution::NoUpdate);
    }
    assert_eq!(counters.connected(), 3);
    assert_eq!(counters.released(), 3);
}
