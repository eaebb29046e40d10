//! Host port: the CI platform running us against one pull request.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;

/// Boxed future type alias used by [`ChangeRequestHost`] to keep the trait dyn-compatible.
pub type HostFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PortError>> + Send + 'a>>;

/// Snapshot of the pull request taken once when the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestEvent {
    /// Pull request title.
    pub title: String,
    /// Pull request description; empty when the event has none.
    pub body: String,
    /// Source branch name without the `refs/heads/` prefix.
    pub branch: String,
}

/// Reads the triggering pull request and writes back to it.
pub trait ChangeRequestHost: Send + Sync {
    /// Returns the pull request snapshot from the triggering event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is missing or is not a pull request event.
    fn event(&self) -> Result<ChangeRequestEvent, PortError>;

    /// Replaces the pull request description.
    ///
    /// # Errors
    ///
    /// Returns an error if the update request fails.
    fn update_body(&self, body: &str) -> HostFuture<'_>;

    /// Posts a comment on the pull request.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment request fails.
    fn post_comment(&self, comment: &str) -> HostFuture<'_>;

    /// Publishes a named step output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn set_output(&self, name: &str, value: &str) -> Result<(), PortError>;

    /// Marks the run as failed with `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the failure cannot be reported.
    fn fail(&self, message: &str) -> Result<(), PortError>;
}
