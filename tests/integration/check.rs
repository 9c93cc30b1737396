use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use super::bfclient;

const REPORT: &str = "bfclient.updater.exception.log";

#[test]
fn test_disabled_check_skips_feed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "[updater]\nenabled = false\n").unwrap();

    bfclient(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Update checks are disabled"));

    assert!(!temp.path().join(REPORT).exists());
}

#[test]
fn test_failed_check_writes_single_report() {
    let temp = TempDir::new().unwrap();

    bfclient(temp.path())
        .args(["check", "--feed-url", "https://example.com/not-github"])
        .assert()
        .success()
        .stdout(predicate::str::contains("An error occurred while checking for updates!"))
        .stdout(predicate::str::contains("Please contact the developers!"))
        .stdout(predicate::str::contains("Update check failed. Details were written to"));

    let report = fs::read_to_string(temp.path().join(REPORT)).unwrap();
    assert!(report.starts_with("EXCEPTIONS OCCURRED AS OF"));
    assert!(report.contains("OS VERSION DETAILS"));
    assert!(report.contains("Release feed URL is not a GitHub repository: https://example.com/not-github"));
}

#[test]
fn test_configured_report_location() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.toml"),
        "[updater]\nfeed_url = \"https://example.com/x\"\ndiagnostic_log = \"logs/update.log\"\n",
    )
    .unwrap();

    bfclient(temp.path()).arg("check").assert().success();

    assert!(temp.path().join("logs").join("update.log").exists());
    assert!(!temp.path().join(REPORT).exists());
}

#[test]
fn test_surfaced_error_exits_nonzero_without_report() {
    let temp = TempDir::new().unwrap();

    bfclient(temp.path())
        .args(["check", "--surface-errors", "--feed-url", "https://example.com/not-github"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("An error occurred while checking for updates"));

    assert!(!temp.path().join(REPORT).exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "[updater\n").unwrap();

    bfclient(temp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
