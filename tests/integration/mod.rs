//! Integration test suite for bfclient.
//!
//! Runs the built binary end to end. None of these tests reach the network:
//! they either skip the check or fail before the feed is queried.
//!
//! ```bash
//! cargo test --test integration
//! ```

mod about;
mod check;

use assert_cmd::Command;
use std::path::Path;

/// A `bfclient` command isolated in `dir`, with its config pointed at `dir/config.toml`.
pub fn bfclient(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bfclient").unwrap();
    cmd.current_dir(dir)
        .env("BFCLIENT_CONFIG_PATH", dir.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
