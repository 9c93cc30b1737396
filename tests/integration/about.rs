use predicates::prelude::*;
use tempfile::TempDir;

use super::bfclient;

#[test]
fn test_about_shows_identity_and_version() {
    let temp = TempDir::new().unwrap();
    let version = env!("CARGO_PKG_VERSION");

    bfclient(temp.path())
        .arg("about")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("About bfclient, Version={version}")))
        .stdout(predicate::str::contains(format!("Version: {version}")));
}

#[test]
fn test_help_lists_commands() {
    let temp = TempDir::new().unwrap();

    bfclient(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("about"));
}
