//! Ticket existence checks against the issue tracker.

use tracing::{info, warn};

use super::PipelineError;
use crate::ports::{IssueTracker, LookupResponse};
use crate::ticket::{TicketId, TicketSet};

/// Classified answer for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The ticket exists.
    Found,
    /// The tracker says the ticket does not exist.
    NotFound,
    /// Any other answer, or no answer at all.
    TransportError(String),
}

/// Classifies a lookup response by status code alone.
#[must_use]
pub fn classify(response: LookupResponse) -> Verification {
    match response.status {
        200 => Verification::Found,
        404 => Verification::NotFound,
        status => Verification::TransportError(format!("HTTP {status}: {}", response.body)),
    }
}

/// Looks up one ticket.
pub async fn verify(tracker: &dyn IssueTracker, ticket: &TicketId) -> Verification {
    match tracker.lookup(ticket).await {
        Ok(response) => classify(response),
        Err(e) => Verification::TransportError(e.to_string()),
    }
}

/// Looks up every ticket in order, stopping at the first one not found.
///
/// # Errors
///
/// Returns [`PipelineError::UnknownTicket`] for a ticket the tracker does not
/// know, and [`PipelineError::Transport`] for any other failed lookup.
pub async fn verify_all(tracker: &dyn IssueTracker, tickets: &TicketSet) -> Result<(), PipelineError> {
    for ticket in tickets {
        info!(%ticket, "Verifying that ticket exists in JIRA");
        match verify(tracker, ticket).await {
            Verification::Found => info!(%ticket, "JIRA ticket found"),
            Verification::NotFound => {
                warn!(%ticket, "JIRA ticket not found");
                return Err(PipelineError::UnknownTicket { ticket: ticket.clone() });
            }
            Verification::TransportError(detail) => {
                warn!(%ticket, %detail, "JIRA lookup failed");
                return Err(PipelineError::Transport { ticket: ticket.clone(), detail });
            }
        }
    }
    Ok(())
}
