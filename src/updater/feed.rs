//! Release feed access.
//!
//! A [`ReleaseFeed`] hands out a [`FeedSession`] for the duration of one check.
//! The session is the scoped resource of the check: it is released when dropped,
//! so every exit path out of the checker (success, early return, `?`) closes it.
//!
//! [`GithubFeed`] is the production feed. It delegates release listing and
//! binary replacement to the `self_update` crate, running its blocking calls on
//! tokio's blocking pool.

use semver::Version;
use self_update::Status;
use self_update::backends::github::{ReleaseList, Update};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::core::UpdateError;

/// A release on the feed that is newer than the running build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRelease {
    pub version: Version,
    pub name: String,
    pub notes: Option<String>,
}

/// Source of release information for one application.
#[allow(async_fn_in_trait)]
pub trait ReleaseFeed {
    /// Session type held open for the duration of a check.
    type Session: FeedSession;

    /// Open a session on the feed.
    async fn connect(&self) -> Result<Self::Session, UpdateError>;
}

/// An open connection to a release feed. Dropping it releases the connection.
#[allow(async_fn_in_trait)]
pub trait FeedSession {
    /// Releases newer than the running build, oldest first.
    async fn pending_releases(&self) -> Result<Vec<PendingRelease>, UpdateError>;

    /// Download and apply the newest release. Returns the version now installed.
    async fn apply_update(&self) -> Result<String, UpdateError>;
}

/// Split a GitHub repository URL into `(owner, name)`.
///
/// Accepts `https://github.com/<owner>/<name>` with an optional `.git` suffix or
/// trailing slash.
///
/// # Errors
///
/// Returns [`UpdateError::InvalidFeedUrl`] for anything else.
pub fn parse_github_repo(url: &str) -> Result<(String, String), UpdateError> {
    let invalid = || UpdateError::InvalidFeedUrl {
        url: url.to_string(),
    };

    let path = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
        .ok_or_else(invalid)?;
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(invalid()),
    }
}

/// Keep the feed entries strictly newer than `current`, oldest first.
///
/// Entries are `(tag, name, notes)`. Tags may carry a leading `v`. Tags that
/// are not valid semver are skipped with a warning.
pub fn select_pending<I>(entries: I, current: &Version) -> Vec<PendingRelease>
where
    I: IntoIterator<Item = (String, String, Option<String>)>,
{
    let mut pending: Vec<PendingRelease> = entries
        .into_iter()
        .filter_map(|(tag, name, notes)| match Version::parse(tag.trim_start_matches('v')) {
            Ok(version) => Some(PendingRelease {
                version,
                name,
                notes,
            }),
            Err(e) => {
                warn!("Skipping release '{}' with unparseable version: {}", tag, e);
                None
            }
        })
        .filter(|release| release.version > *current)
        .collect();

    pending.sort_by(|a, b| a.version.cmp(&b.version));
    pending.dedup_by(|a, b| a.version == b.version);
    pending
}

/// Await a blocking feed task, giving up after `limit` when one is set.
///
/// On expiry the task is abandoned, not cancelled: it keeps its blocking thread
/// until the underlying call returns.
///
/// # Errors
///
/// Returns [`UpdateError::FeedTimeout`] when `limit` elapses first and
/// [`UpdateError::TaskJoin`] if the task panicked.
pub async fn join_within<T>(task: JoinHandle<T>, limit: Option<Duration>, url: &str) -> Result<T, UpdateError> {
    let joined = match limit {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            warn!("Release feed at {} timed out after {:?}", url, limit);
            UpdateError::FeedTimeout {
                url: url.to_string(),
                seconds: limit.as_secs(),
            }
        })?,
        None => task.await,
    };
    Ok(joined?)
}

/// Version installed by a finished update.
///
/// `self_update` only installs the most recently published release, so a feed
/// can list newer versions and still leave the build unchanged.
///
/// # Errors
///
/// Returns [`UpdateError::Apply`] when nothing was installed.
pub fn installed_version(status: Status) -> Result<String, UpdateError> {
    match status {
        Status::Updated(version) => Ok(version),
        Status::UpToDate(version) => Err(UpdateError::Apply {
            source: format!("latest published release {version} is not newer than the running build").into(),
        }),
    }
}

/// Release feed backed by GitHub releases.
#[derive(Debug, Clone)]
pub struct GithubFeed {
    url: String,
    bin_name: String,
    current_version: String,
    timeout: Option<Duration>,
}

impl GithubFeed {
    /// Create a feed for the repository at `url`.
    pub fn new(url: impl Into<String>, bin_name: impl Into<String>, current_version: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bin_name: bin_name.into(),
            current_version: current_version.into(),
            timeout: None,
        }
    }

    /// Bound the release query. Without a timeout a stalled feed blocks the check.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ReleaseFeed for GithubFeed {
    type Session = GithubSession;

    async fn connect(&self) -> Result<GithubSession, UpdateError> {
        let (owner, name) = parse_github_repo(&self.url)?;
        let current = Version::parse(&self.current_version).map_err(|source| {
            UpdateError::InvalidVersion {
                version: self.current_version.clone(),
                source,
            }
        })?;

        debug!("Opened release feed session for {}/{}", owner, name);
        Ok(GithubSession {
            url: self.url.clone(),
            owner,
            name,
            bin_name: self.bin_name.clone(),
            current,
            timeout: self.timeout,
        })
    }
}

/// Open session on a GitHub release feed.
#[derive(Debug)]
pub struct GithubSession {
    url: String,
    owner: String,
    name: String,
    bin_name: String,
    current: Version,
    timeout: Option<Duration>,
}

impl GithubSession {
    async fn fetch_entries(&self) -> Result<Vec<(String, String, Option<String>)>, UpdateError> {
        let owner = self.owner.clone();
        let name = self.name.clone();
        let url = self.url.clone();

        let task = tokio::task::spawn_blocking(move || {
            ReleaseList::configure().repo_owner(&owner).repo_name(&name).build()?.fetch()
        });

        let releases = join_within(task, self.timeout, &url).await?.map_err(|e| UpdateError::Feed {
            url,
            source: Box::new(e),
        })?;

        Ok(releases.into_iter().map(|r| (r.version, r.name, r.body)).collect())
    }
}

impl FeedSession for GithubSession {
    async fn pending_releases(&self) -> Result<Vec<PendingRelease>, UpdateError> {
        debug!("Checking for updates from {}/{}", self.owner, self.name);

        let pending = select_pending(self.fetch_entries().await?, &self.current);
        if pending.is_empty() {
            debug!("Already on latest version {}", self.current);
        } else {
            info!("{} update(s) found", pending.len());
            for release in &pending {
                let notes = release.notes.as_deref().and_then(|n| n.lines().next()).unwrap_or("");
                debug!("  {} {}: {}", release.version, release.name, notes);
            }
        }
        Ok(pending)
    }

    async fn apply_update(&self) -> Result<String, UpdateError> {
        info!("Starting self-update process");

        let owner = self.owner.clone();
        let name = self.name.clone();
        let bin_name = self.bin_name.clone();
        let current = self.current.to_string();

        let status = tokio::task::spawn_blocking(move || {
            Update::configure()
                .repo_owner(&owner)
                .repo_name(&name)
                .bin_name(&bin_name)
                .show_download_progress(true)
                .no_confirm(true)
                .current_version(&current)
                .build()?
                .update()
        })
        .await?
        .map_err(|e| UpdateError::Apply {
            source: Box::new(e),
        })?;

        let installed = installed_version(status)?;
        info!("Successfully updated to version {}", installed);
        Ok(installed)
    }
}

impl Drop for GithubSession {
    fn drop(&mut self) {
        debug!("Released release feed session for {}/{}", self.owner, self.name);
    }
}
