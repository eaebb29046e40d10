//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::live::{GithubHost, JiraTracker};
use crate::adapters::recording::{RecordingHost, RecordingTracker};
use crate::adapters::replaying::{ReplayingHost, ReplayingTracker};
use crate::cassette::config::load_replayers;
use crate::cassette::session::RecordingSession;
use crate::config::Config;
use crate::ports::{ChangeRequestHost, IssueTracker};

/// Bundles the port trait objects a run talks to.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying).
pub struct ServiceContext {
    /// CI host owning the pull request.
    pub host: Box<dyn ChangeRequestHost>,
    /// Issue tracker owning the tickets.
    pub tracker: Box<dyn IssueTracker>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn with_ports(host: Box<dyn ChangeRequestHost>, tracker: Box<dyn IssueTracker>) -> Self {
        Self { host, tracker }
    }

    /// Creates a live context: GitHub Actions host, Jira tracker.
    ///
    /// # Errors
    ///
    /// Returns an error if the Actions environment or event payload is unusable.
    pub fn live(config: &Config) -> Result<Self, String> {
        Ok(Self {
            host: Box::new(GithubHost::from_env(&config.github_token)?),
            tracker: Box::new(JiraTracker::new(&config.atlassian_domain, &config.atlassian_token)),
        })
    }

    /// Creates a live context whose interactions are recorded under `dir`.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the live context or the cassette directory cannot be created.
    pub fn recording_at(dir: PathBuf, config: &Config) -> Result<(Self, RecordingSession), String> {
        let live = Self::live(config)?;
        let session = RecordingSession::new(dir)?;
        let ctx = Self {
            host: Box::new(RecordingHost::new(live.host, Arc::clone(&session.host))),
            tracker: Box::new(RecordingTracker::new(live.tracker, Arc::clone(&session.tracker))),
        };
        Ok((ctx, session))
    }

    /// Creates a context served entirely from recorded cassettes.
    ///
    /// `path` is either a single cassette file holding both ports, or a
    /// recording directory with one cassette per port.
    ///
    /// # Errors
    ///
    /// Returns an error if a cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayers = load_replayers(path)?;
        Ok(Self {
            host: Box::new(ReplayingHost::new(replayers.host)),
            tracker: Box::new(ReplayingTracker::new(replayers.tracker)),
        })
    }
}
