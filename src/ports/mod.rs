//! Port traits defining external boundaries.
//!
//! The pipeline only talks to the outside world through these traits: the
//! CI host that owns the pull request, and the issue tracker that owns the
//! tickets. Implementations live in `src/adapters/`.

pub mod host;
pub mod tracker;

pub use host::{ChangeRequestEvent, ChangeRequestHost, HostFuture};
pub use tracker::{IssueTracker, LookupFuture, LookupResponse};

/// Error type returned by every port.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
