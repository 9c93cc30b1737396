//! Test doubles for the update checker.
//!
//! Available to unit tests and, through the `test-utils` feature, to the test
//! suites under `tests/`. Each double records what the checker asked of it so
//! tests can assert on the sequence of effects.

use semver::Version;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::UpdateError;
use crate::ui::Dialogs;
use crate::updater::feed::{FeedSession, PendingRelease, ReleaseFeed};
use crate::updater::process::ProcessControl;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Uses `level` when given, otherwise `RUST_LOG`. With neither, tests run
/// without a subscriber.
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Build `count` pending releases numbered upward from `1.0.1`.
pub fn pending_releases(count: usize) -> Vec<PendingRelease> {
    (1..=count as u64)
        .map(|patch| PendingRelease {
            version: Version::new(1, 0, patch),
            name: format!("v1.0.{patch}"),
            notes: None,
        })
        .collect()
}

/// Where a [`MockFeed`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Connect,
    Query,
    Apply,
}

/// Counters shared between a [`MockFeed`], its sessions, and the test.
#[derive(Debug, Default)]
pub struct FeedCounters {
    pub connected: AtomicUsize,
    pub released: AtomicUsize,
    pub queried: AtomicUsize,
    pub applied: AtomicUsize,
}

impl FeedCounters {
    pub fn connected(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn queried(&self) -> usize {
        self.queried.load(Ordering::SeqCst)
    }

    pub fn applied(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }
}

/// In-memory release feed.
#[derive(Debug, Clone)]
pub struct MockFeed {
    pending: Vec<PendingRelease>,
    failure: Option<MockFailure>,
    counters: Arc<FeedCounters>,
}

impl MockFeed {
    /// A feed reporting `count` pending releases.
    pub fn with_pending(count: usize) -> Self {
        Self {
            pending: pending_releases(count),
            failure: None,
            counters: Arc::default(),
        }
    }

    pub fn failing_at(mut self, failure: MockFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn counters(&self) -> Arc<FeedCounters> {
        Arc::clone(&self.counters)
    }

    fn injected(&self, at: MockFailure) -> Result<(), UpdateError> {
        match self.failure {
            Some(failure) if failure == at => Err(match at {
                MockFailure::Apply => UpdateError::Apply {
                    source: "simulated apply failure".into(),
                },
                _ => UpdateError::Feed {
                    url: "https://github.com/test/releases".to_string(),
                    source: "simulated network failure".into(),
                },
            }),
            _ => Ok(()),
        }
    }
}

impl ReleaseFeed for MockFeed {
    type Session = MockSession;

    async fn connect(&self) -> Result<MockSession, UpdateError> {
        self.injected(MockFailure::Connect)?;
        self.counters.connected.fetch_add(1, Ordering::SeqCst);
        Ok(MockSession {
            feed: self.clone(),
        })
    }
}

/// Session handed out by [`MockFeed`]. Counts its own release on drop.
#[derive(Debug)]
pub struct MockSession {
    feed: MockFeed,
}

impl FeedSession for MockSession {
    async fn pending_releases(&self) -> Result<Vec<PendingRelease>, UpdateError> {
        self.feed.counters.queried.fetch_add(1, Ordering::SeqCst);
        self.feed.injected(MockFailure::Query)?;
        Ok(self.feed.pending.clone())
    }

    async fn apply_update(&self) -> Result<String, UpdateError> {
        self.feed.counters.applied.fetch_add(1, Ordering::SeqCst);
        self.feed.injected(MockFailure::Apply)?;
        Ok(self
            .feed
            .pending
            .last()
            .map(|release| release.version.to_string())
            .unwrap_or_default())
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.feed.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Kind of dialog shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Error,
}

/// A dialog the checker showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownDialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

/// Dialogs answering confirmations from a fixed script.
///
/// Running out of answers is an I/O error, which surfaces an unexpected prompt
/// as a failed check.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    answers: VecDeque<bool>,
    shown: Vec<ShownDialog>,
}

impl ScriptedDialogs {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            shown: Vec::new(),
        }
    }

    pub fn shown(&self) -> &[ShownDialog] {
        &self.shown
    }

    pub fn confirmations(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter(|d| d.kind == DialogKind::Confirm)
            .map(|d| d.message.as_str())
            .collect()
    }

    pub fn errors(&self) -> usize {
        self.shown.iter().filter(|d| d.kind == DialogKind::Error).count()
    }
}

impl Dialogs for ScriptedDialogs {
    async fn confirm(&mut self, title: &str, message: &str) -> io::Result<bool> {
        self.shown.push(ShownDialog {
            kind: DialogKind::Confirm,
            title: title.to_string(),
            message: message.to_string(),
        });
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }

    async fn show_error(&mut self, title: &str, message: &str) -> io::Result<()> {
        self.shown.push(ShownDialog {
            kind: DialogKind::Error,
            title: title.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// Process control that records calls instead of acting on them.
#[derive(Debug, Default)]
pub struct RecordingProcess {
    restarts: AtomicUsize,
    exits: Mutex<Vec<i32>>,
    fail_restart: bool,
}

impl RecordingProcess {
    pub fn failing_restart() -> Self {
        Self {
            fail_restart: true,
            ..Self::default()
        }
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> Vec<i32> {
        self.exits.lock().map(|codes| codes.clone()).unwrap_or_default()
    }
}

impl ProcessControl for RecordingProcess {
    fn restart(&self) -> Result<(), UpdateError> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        if self.fail_restart {
            return Err(UpdateError::Restart {
                source: io::Error::new(io::ErrorKind::NotFound, "executable missing"),
            });
        }
        Ok(())
    }

    fn exit(&self, code: i32) {
        if let Ok(mut codes) = self.exits.lock() {
            codes.push(code);
        }
    }
}
