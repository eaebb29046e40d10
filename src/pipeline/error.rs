//! Failure taxonomy of a pipeline run.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ticket::{ExtractError, TicketId, TicketSet};

/// Machine-readable failure codes, published as the `error-code` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// The title has no usable ticket.
    InvalidTitle,
    /// The branch name has no usable ticket.
    InvalidBranchName,
    /// Title and branch name reference different tickets.
    BranchTicketDiffersTitleTicket,
    /// The tracker does not know the ticket.
    UnknownJiraTicket,
    /// The body follows the prefix convention but names another ticket.
    TicketMissingInBody,
}

impl ErrorCode {
    /// Wire form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTitle => "invalid-title",
            Self::InvalidBranchName => "invalid-branch-name",
            Self::BranchTicketDiffersTitleTicket => "branch-ticket-differs-title-ticket",
            Self::UnknownJiraTicket => "unknown-jira-ticket",
            Self::TicketMissingInBody => "ticket-missing-in-body",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Title extraction failed.
    #[error("Invalid PR title: {source}")]
    InvalidTitle {
        /// Extraction failure.
        source: ExtractError,
        /// Remediation text for the author, when one applies.
        comment: Option<String>,
    },
    /// Branch name extraction failed.
    #[error("Invalid branch name: {source}")]
    InvalidBranchName {
        /// Extraction failure.
        source: ExtractError,
        /// Remediation text for the author, when one applies.
        comment: Option<String>,
    },
    /// Title and branch name disagree.
    #[error(
        "Branch tickets differ from title tickets (only in title: [{title_only}], only in branch: [{branch_only}])"
    )]
    BranchTicketDiffersTitleTicket {
        /// Tickets named by the title only.
        title_only: TicketSet,
        /// Tickets named by the branch only.
        branch_only: TicketSet,
    },
    /// Tracker answered "not found".
    #[error("Unknown JIRA ticket: {ticket}")]
    UnknownTicket {
        /// Ticket that does not exist.
        ticket: TicketId,
    },
    /// Tracker answered anything else, or could not be reached.
    #[error("Unknown JIRA ticket: {ticket}: {detail}")]
    Transport {
        /// Ticket being looked up.
        ticket: TicketId,
        /// Raw response body or transport error.
        detail: String,
    },
    /// Body has the prefix but not the expected ticket after it.
    #[error("PR body contains {prefix:?} but not {prefix}{ticket}")]
    TicketMissingInBody {
        /// Ticket expected after the prefix.
        ticket: TicketId,
        /// Configured body prefix.
        prefix: String,
    },
    /// Reading the event or writing to the pull request failed.
    #[error("{0}")]
    Host(String),
}

impl PipelineError {
    /// Error code to publish, `None` for unclassified failures.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::InvalidTitle { .. } => Some(ErrorCode::InvalidTitle),
            Self::InvalidBranchName { .. } => Some(ErrorCode::InvalidBranchName),
            Self::BranchTicketDiffersTitleTicket { .. } => {
                Some(ErrorCode::BranchTicketDiffersTitleTicket)
            }
            Self::UnknownTicket { .. } => Some(ErrorCode::UnknownJiraTicket),
            Self::TicketMissingInBody { .. } => Some(ErrorCode::TicketMissingInBody),
            Self::Transport { .. } | Self::Host(_) => None,
        }
    }

    /// Remediation text to post on the pull request, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::InvalidTitle { comment, .. } | Self::InvalidBranchName { comment, .. } => {
                comment.as_deref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::set;

    #[test]
    fn codes_serialize_kebab_case() {
        let json = serde_json::to_string(&ErrorCode::BranchTicketDiffersTitleTicket).unwrap();
        assert_eq!(json, "\"branch-ticket-differs-title-ticket\"");
        assert_eq!(
            serde_json::to_string(&ErrorCode::UnknownJiraTicket).unwrap(),
            format!("\"{}\"", ErrorCode::UnknownJiraTicket.as_str())
        );
    }

    #[test]
    fn transport_failures_are_unclassified() {
        let err = PipelineError::Transport {
            ticket: TicketId::parse("ABC-1").unwrap(),
            detail: "HTTP 500".into(),
        };
        assert_eq!(err.code(), None);
        assert_eq!(err.comment(), None);
    }

    #[test]
    fn mismatch_message_names_both_sides() {
        let err = PipelineError::BranchTicketDiffersTitleTicket {
            title_only: set(&["ABC-123"]),
            branch_only: set(&["ABC-124"]),
        };
        let message = err.to_string();
        assert!(message.contains("only in title: [ABC-123]"));
        assert!(message.contains("only in branch: [ABC-124]"));
        assert_eq!(err.comment(), None);
    }
}
