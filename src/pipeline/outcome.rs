//! Final outcome of a run and how it is handed back to the host.

use tracing::{error, info, warn};

use super::{PipelineError, Success};
use crate::pipeline::ErrorCode;
use crate::ports::ChangeRequestHost;
use crate::ticket::TicketSet;

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Every stage passed.
    Succeeded {
        /// Verified tickets in extraction order.
        tickets: TicketSet,
        /// Whether the body was rewritten on the pull request.
        body_updated: bool,
    },
    /// A stage failed; later stages never ran.
    Failed {
        /// Classified code, `None` for infrastructure failures.
        code: Option<ErrorCode>,
        /// Human-readable failure message.
        message: String,
    },
}

/// What the host is told once the run is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Terminal state.
    pub status: Status,
    /// Remediation text to post on the pull request.
    pub comment: Option<String>,
}

impl Outcome {
    /// Builds the outcome of a finished run.
    #[must_use]
    pub fn from_run(result: Result<Success, PipelineError>) -> Self {
        match result {
            Ok(success) => Self {
                status: Status::Succeeded {
                    tickets: success.tickets,
                    body_updated: success.body_updated,
                },
                comment: None,
            },
            Err(err) => Self {
                comment: err.comment().map(str::to_string),
                status: Status::Failed { code: err.code(), message: err.to_string() },
            },
        }
    }

    /// Whether the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Succeeded { .. })
    }
}

/// Publishes `outcome` through the host.
///
/// On success the `ticket` output is set; if that fails the host is told
/// the run failed. On failure the remediation comment
/// is posted when there is one, the `error-code` output is set for
/// classified failures, and the host is told the run failed.
///
/// # Errors
///
/// Returns the failure message when the run failed, or when the outcome
/// could not be published.
pub async fn report(host: &dyn ChangeRequestHost, outcome: &Outcome) -> Result<(), String> {
    match &outcome.status {
        Status::Succeeded { tickets, body_updated } => {
            info!(tickets = %tickets, body_updated, "Ticket check passed");
            host.set_output("ticket", &tickets.join(",")).map_err(|e| {
                let message = format!("Failed to set ticket output: {e}");
                error!("{message}");
                if let Err(e) = host.fail(&message) {
                    warn!(error = %e, "Failed to report failure to host");
                }
                message
            })
        }
        Status::Failed { code, message } => {
            if let Some(comment) = &outcome.comment {
                match host.post_comment(comment).await {
                    Ok(()) => info!("Posted remediation comment"),
                    // The run already failed; keep its message rather than this one.
                    Err(e) => warn!(error = %e, "Failed to post remediation comment"),
                }
            }
            if let Some(code) = code {
                if let Err(e) = host.set_output("error-code", code.as_str()) {
                    warn!(error = %e, "Failed to set error-code output");
                }
            }
            error!(code = code.map_or("unclassified", ErrorCode::as_str), "{message}");
            if let Err(e) = host.fail(message) {
                warn!(error = %e, "Failed to report failure to host");
            }
            Err(message.clone())
        }
    }
}
