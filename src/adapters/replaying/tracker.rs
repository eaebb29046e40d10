//! Replaying adapter for the `IssueTracker` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{IssueTracker, LookupFuture, LookupResponse, PortError};
use crate::ticket::TicketId;

/// Serves recorded lookups from a cassette.
pub struct ReplayingTracker {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTracker {
    /// Creates a replaying tracker backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// Number of recorded lookups not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().map_or(0, |r| r.remaining())
    }
}

impl IssueTracker for ReplayingTracker {
    fn lookup(&self, _ticket: &TicketId) -> LookupFuture<'_> {
        let result: Result<LookupResponse, PortError> =
            replay_result(&self.replayer, "tracker", "lookup");
        Box::pin(async move { result })
    }
}
