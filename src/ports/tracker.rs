//! Issue tracker port for looking up tickets.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use super::PortError;
use crate::ticket::TicketId;

/// Boxed future type alias used by [`IssueTracker`] to keep the trait dyn-compatible.
pub type LookupFuture<'a> =
    Pin<Box<dyn Future<Output = Result<LookupResponse, PortError>> + Send + 'a>>;

/// Raw answer to an issue lookup. Classification happens in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, kept as diagnostic detail.
    pub body: String,
}

/// Looks up tickets in an external tracker.
///
/// Abstracting the tracker allows deterministic replay and testing
/// without touching a real Jira instance.
pub trait IssueTracker: Send + Sync {
    /// Fetches the issue named by `ticket`.
    ///
    /// Any HTTP status is a successful lookup at this level; only a failure
    /// to get a response at all is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the response cannot be read.
    fn lookup(&self, ticket: &TicketId) -> LookupFuture<'_>;
}
