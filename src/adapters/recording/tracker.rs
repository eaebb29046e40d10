//! Recording adapter for the `IssueTracker` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{IssueTracker, LookupFuture};
use crate::ticket::TicketId;

/// Records tracker lookups while delegating to an inner implementation.
pub struct RecordingTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingTracker {
    /// Creates a recording tracker wrapping `inner`.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct LookupInput<'a> {
    ticket: &'a TicketId,
}

impl IssueTracker for RecordingTracker {
    fn lookup(&self, ticket: &TicketId) -> LookupFuture<'_> {
        let ticket = ticket.clone();
        Box::pin(async move {
            let result = self.inner.lookup(&ticket).await;
            record_result(&self.recorder, "tracker", "lookup", &LookupInput { ticket: &ticket }, &result);
            result
        })
    }
}
