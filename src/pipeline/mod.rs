//! The ticket check: extract, reconcile, verify, rewrite.
//!
//! Stages run strictly in that order against one snapshot of the pull
//! request. The first failing stage ends the run; the only write to the pull
//! request happens after every check has passed.

pub mod error;
pub mod outcome;
pub mod rewrite;
pub mod verify;

use tracing::{debug, info};

pub use error::{ErrorCode, PipelineError};
pub use outcome::{report, Outcome, Status};

use crate::config::{Config, SourceRule};
use crate::context::ServiceContext;
use crate::ticket::{extract, reconcile, ExtractError, Reconciliation, TicketSet};

/// Result of a run that passed every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Success {
    /// Verified tickets in title order.
    pub tickets: TicketSet,
    /// Whether the pull request body was rewritten.
    pub body_updated: bool,
}

/// Which text a rule is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Title,
    Branch,
}

impl Source {
    fn label(self) -> &'static str {
        match self {
            Self::Title => "PR title",
            Self::Branch => "branch name",
        }
    }
}

/// Runs the check against the pull request the host is serving.
///
/// # Errors
///
/// Returns the [`PipelineError`] of the first stage that failed.
pub async fn run(ctx: &ServiceContext, config: &Config) -> Result<Success, PipelineError> {
    let event = ctx
        .host
        .event()
        .map_err(|e| PipelineError::Host(format!("Failed to read pull request event: {e}")))?;

    let title_tickets = extract_from(Source::Title, &event.title, &config.title)?;
    let branch_tickets = extract_from(Source::Branch, &event.branch, &config.branch)?;

    let tickets = match reconcile(&title_tickets, &branch_tickets) {
        Reconciliation::Consistent(tickets) => tickets,
        Reconciliation::Inconsistent { left_only, right_only } => {
            return Err(PipelineError::BranchTicketDiffersTitleTicket {
                title_only: left_only,
                branch_only: right_only,
            });
        }
    };
    info!(tickets = %tickets, "Title and branch name reference the same tickets");

    verify::verify_all(ctx.tracker.as_ref(), &tickets).await?;

    let plan = rewrite::plan(
        &event.body,
        &tickets,
        &config.atlassian_domain,
        config.body_ticket_prefix.as_deref(),
    )
    .map_err(|e| PipelineError::TicketMissingInBody { ticket: e.ticket, prefix: e.prefix })?;

    if plan.body == event.body {
        debug!("PR body already links every ticket or does not mention them");
        return Ok(Success { tickets, body_updated: false });
    }

    info!(substitutions = plan.substitutions.len(), "Linking tickets in PR body");
    ctx.host
        .update_body(&plan.body)
        .await
        .map_err(|e| PipelineError::Host(format!("Failed to update PR body: {e}")))?;
    info!("PR body updated");

    Ok(Success { tickets, body_updated: true })
}

fn extract_from(source: Source, text: &str, rule: &SourceRule) -> Result<TicketSet, PipelineError> {
    info!(
        pattern = rule.rule.pattern(),
        flags = rule.rule.flags(),
        "Checking {} {text:?}",
        source.label()
    );

    let err = match extract(text, &rule.rule) {
        Ok(tickets) => {
            info!(tickets = %tickets, "The {} matches", source.label());
            return Ok(tickets);
        }
        Err(err) => err,
    };

    // A pattern that matches without capturing is the workflow's fault, not the author's.
    let comment = match err {
        ExtractError::NoMatch { .. } => rule.remediation(text),
        ExtractError::MissingCaptureGroup { .. } => None,
    };
    Err(match source {
        Source::Title => PipelineError::InvalidTitle { source: err, comment },
        Source::Branch => PipelineError::InvalidBranchName { source: err, comment },
    })
}

/// In-memory ports for pipeline tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use crate::ports::{
        ChangeRequestEvent, ChangeRequestHost, HostFuture, IssueTracker, LookupFuture,
        LookupResponse, PortError,
    };
    use crate::ticket::TicketId;

    #[derive(Default)]
    struct HostLog {
        updates: Vec<String>,
        comments: Vec<String>,
        outputs: Vec<(String, String)>,
        failures: Vec<String>,
    }

    /// Host serving a fixed event and remembering every write.
    #[derive(Clone)]
    pub(crate) struct FakeHost {
        event: ChangeRequestEvent,
        log: Arc<Mutex<HostLog>>,
        failing_comments: bool,
        failing_outputs: bool,
    }

    impl FakeHost {
        pub(crate) fn new(title: &str, body: &str, branch: &str) -> Self {
            Self {
                event: ChangeRequestEvent {
                    title: title.into(),
                    body: body.into(),
                    branch: branch.into(),
                },
                log: Arc::default(),
                failing_comments: false,
                failing_outputs: false,
            }
        }

        pub(crate) fn failing_comments(mut self) -> Self {
            self.failing_comments = true;
            self
        }

        pub(crate) fn failing_outputs(mut self) -> Self {
            self.failing_outputs = true;
            self
        }

        pub(crate) fn updates(&self) -> Vec<String> {
            self.log.lock().unwrap().updates.clone()
        }

        pub(crate) fn comments(&self) -> Vec<String> {
            self.log.lock().unwrap().comments.clone()
        }

        pub(crate) fn outputs(&self) -> Vec<(String, String)> {
            self.log.lock().unwrap().outputs.clone()
        }

        pub(crate) fn failures(&self) -> Vec<String> {
            self.log.lock().unwrap().failures.clone()
        }
    }

    impl ChangeRequestHost for FakeHost {
        fn event(&self) -> Result<ChangeRequestEvent, PortError> {
            Ok(self.event.clone())
        }

        fn update_body(&self, body: &str) -> HostFuture<'_> {
            self.log.lock().unwrap().updates.push(body.to_string());
            Box::pin(async { Ok(()) })
        }

        fn post_comment(&self, comment: &str) -> HostFuture<'_> {
            let failing = self.failing_comments;
            if !failing {
                self.log.lock().unwrap().comments.push(comment.to_string());
            }
            Box::pin(async move {
                if failing {
                    Err("comments are disabled".into())
                } else {
                    Ok(())
                }
            })
        }

        fn set_output(&self, name: &str, value: &str) -> Result<(), PortError> {
            if self.failing_outputs {
                return Err("output file is read-only".into());
            }
            self.log.lock().unwrap().outputs.push((name.to_string(), value.to_string()));
            Ok(())
        }

        fn fail(&self, message: &str) -> Result<(), PortError> {
            self.log.lock().unwrap().failures.push(message.to_string());
            Ok(())
        }
    }

    /// Tracker answering from a status table (404 otherwise) and counting lookups.
    #[derive(Clone, Default)]
    pub(crate) struct FakeTracker {
        statuses: Vec<(String, u16)>,
        lookups: Arc<Mutex<Vec<String>>>,
    }

    impl FakeTracker {
        pub(crate) fn with(mut self, ticket: &str, status: u16) -> Self {
            self.statuses.push((ticket.to_string(), status));
            self
        }

        pub(crate) fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl IssueTracker for FakeTracker {
        fn lookup(&self, ticket: &TicketId) -> LookupFuture<'_> {
            self.lookups.lock().unwrap().push(ticket.to_string());
            let status = self
                .statuses
                .iter()
                .find(|(id, _)| id == ticket.as_str())
                .map_or(404, |(_, status)| *status);
            let body = if status == 404 {
                r#"{"errorMessages":["Issue does not exist or you do not have permission to see it."]}"#
            } else {
                r#"{"key":"ok"}"#
            };
            Box::pin(async move { Ok(LookupResponse { status, body: body.to_string() }) })
        }
    }
}
