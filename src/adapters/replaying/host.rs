//! Replaying adapter for the `ChangeRequestHost` port.

use std::sync::Mutex;

use super::replay_result;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ChangeRequestEvent, ChangeRequestHost, HostFuture, PortError};

/// Serves recorded host results from a cassette.
pub struct ReplayingHost {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingHost {
    /// Creates a replaying host backed by `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ChangeRequestHost for ReplayingHost {
    fn event(&self) -> Result<ChangeRequestEvent, PortError> {
        replay_result(&self.replayer, "host", "event")
    }

    fn update_body(&self, _body: &str) -> HostFuture<'_> {
        let result: Result<(), PortError> = replay_result(&self.replayer, "host", "update_body");
        Box::pin(async move { result })
    }

    fn post_comment(&self, _comment: &str) -> HostFuture<'_> {
        let result: Result<(), PortError> = replay_result(&self.replayer, "host", "post_comment");
        Box::pin(async move { result })
    }

    fn set_output(&self, _name: &str, _value: &str) -> Result<(), PortError> {
        replay_result(&self.replayer, "host", "set_output")
    }

    fn fail(&self, _message: &str) -> Result<(), PortError> {
        replay_result(&self.replayer, "host", "fail")
    }
}
