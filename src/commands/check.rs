//! `ticketlink check` command.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::adapters::live::github::escape_command_data;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::pipeline::{self, Outcome};

/// Directory that receives cassettes of every host and tracker interaction.
pub const RECORD_ENV: &str = "TICKETLINK_RECORD";

/// Execute the `check` command.
///
/// Uses live GitHub and Jira adapters unless `--replay` is given. When
/// `TICKETLINK_RECORD` is set, live interactions are recorded there.
///
/// # Errors
///
/// Returns the failure message when configuration is invalid, the
/// collaborators cannot be set up, or the check fails.
pub fn run(args: &CheckArgs) -> Result<(), String> {
    let config = Config::from_args(args).map_err(|e| setup_failure(&e.to_string()))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| setup_failure(&format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(execute(args, &config))
}

async fn execute(args: &CheckArgs, config: &Config) -> Result<(), String> {
    if let Some(path) = &args.replay {
        let ctx = ServiceContext::replaying(path).map_err(|e| setup_failure(&e))?;
        return check(&ctx, config).await;
    }

    match env::var(RECORD_ENV) {
        Ok(dir) if !dir.is_empty() => {
            let (ctx, session) = ServiceContext::recording_at(PathBuf::from(dir), config)
                .map_err(|e| setup_failure(&e))?;
            let result = check(&ctx, config).await;
            // Recording adapters hold the recorders until the context is gone.
            drop(ctx);
            settle_recording(result, session.finish())
        }
        _ => {
            let ctx = ServiceContext::live(config).map_err(|e| setup_failure(&e))?;
            check(&ctx, config).await
        }
    }
}

/// Combines a recorded run with the outcome of saving its cassettes.
///
/// A save failure is only returned when the run itself succeeded.
fn settle_recording(
    result: Result<(), String>,
    saved: Result<PathBuf, String>,
) -> Result<(), String> {
    match saved {
        Ok(dir) => info!(dir = %dir.display(), "Recording saved"),
        Err(e) if result.is_ok() => return Err(e),
        Err(e) => warn!(error = %e, "Failed to save recording"),
    }
    result
}

/// Runs the pipeline and reports its outcome through the context's host.
///
/// # Errors
///
/// Returns the failure message if the check failed.
pub async fn check(ctx: &ServiceContext, config: &Config) -> Result<(), String> {
    let outcome = Outcome::from_run(pipeline::run(ctx, config).await);
    pipeline::report(ctx.host.as_ref(), &outcome).await
}

/// Surfaces a failure that happened before a host was available.
fn setup_failure(message: &str) -> String {
    if env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        println!("::error::{}", escape_command_data(message));
    }
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_args;
    use crate::pipeline::testing::{FakeHost, FakeTracker};

    #[test]
    fn missing_input_fails_before_anything_runs() {
        let args = CheckArgs { github_token: None, ..sample_args() };
        let err = run(&args).unwrap_err();
        assert_eq!(err, "Input required and not supplied: github-token");
    }

    #[test]
    fn recording_save_failure_keeps_check_failure() {
        let result = settle_recording(Err("Unknown JIRA ticket: ABC-1".into()), Err("disk full".into()));
        assert_eq!(result.unwrap_err(), "Unknown JIRA ticket: ABC-1");
    }

    #[test]
    fn recording_save_failure_fails_passing_check() {
        assert_eq!(settle_recording(Ok(()), Err("disk full".into())).unwrap_err(), "disk full");
        assert!(settle_recording(Ok(()), Ok(PathBuf::from("/tmp/rec"))).is_ok());
    }

    #[tokio::test]
    async fn check_reports_commentable_failure() {
        let host = FakeHost::new("No ticket here", "", "ABC-1");
        let tracker = FakeTracker::default();
        let args = CheckArgs { title_comment: Some("Add a ticket to: %text%".into()), ..sample_args() };
        let config = Config::from_args(&args).unwrap();
        let ctx = ServiceContext::with_ports(Box::new(host.clone()), Box::new(tracker.clone()));

        let err = check(&ctx, &config).await.unwrap_err();

        assert!(err.starts_with("Invalid PR title"));
        assert_eq!(host.comments(), vec!["Add a ticket to: No ticket here"]);
        assert_eq!(host.outputs(), vec![("error-code".to_string(), "invalid-title".to_string())]);
        assert!(tracker.lookups().is_empty());
    }

    #[tokio::test]
    async fn check_sets_ticket_output_on_success() {
        let host = FakeHost::new("Fix (abc-7)", "ABC-7", "feature/ABC-7");
        let tracker = FakeTracker::default().with("ABC-7", 200);
        let config = Config::from_args(&sample_args()).unwrap();
        let ctx = ServiceContext::with_ports(Box::new(host.clone()), Box::new(tracker));

        check(&ctx, &config).await.unwrap();

        assert_eq!(host.outputs(), vec![("ticket".to_string(), "ABC-7".to_string())]);
        assert_eq!(host.updates().len(), 1);
    }
}
