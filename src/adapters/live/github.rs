//! Live adapter for the `ChangeRequestHost` port on GitHub Actions.

use std::env;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::ports::{ChangeRequestEvent, ChangeRequestHost, HostFuture, PortError};

const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const AGENT: &str = concat!("ticketlink/", env!("CARGO_PKG_VERSION"));

/// Subset of the workflow event payload we read.
#[derive(Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
    title: String,
    body: Option<String>,
    head: Option<HeadPayload>,
}

#[derive(Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    ref_name: String,
}

/// Pull request a workflow run was triggered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Title, body, and branch at trigger time.
    pub event: ChangeRequestEvent,
}

/// Parses the event payload, taking the branch from `head_ref` when set, then
/// from the payload's head, then from `git_ref`.
///
/// # Errors
///
/// Returns an error if the payload is not JSON or not a pull request event.
pub fn parse_event(
    payload: &str,
    head_ref: Option<&str>,
    git_ref: Option<&str>,
) -> Result<PullRequest, String> {
    let payload: EventPayload =
        serde_json::from_str(payload).map_err(|e| format!("Invalid event payload: {e}"))?;
    let pr = payload
        .pull_request
        .ok_or_else(|| "The triggering event is not a pull request event".to_string())?;

    let branch = head_ref
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or_else(|| pr.head.map(|h| h.ref_name))
        .or_else(|| git_ref.map(branch_from_ref))
        .ok_or_else(|| "Cannot determine the source branch".to_string())?;

    Ok(PullRequest {
        number: pr.number,
        event: ChangeRequestEvent { title: pr.title, body: pr.body.unwrap_or_default(), branch },
    })
}

/// Drops the two leading segments of a ref: `refs/heads/feature/x` is `feature/x`.
#[must_use]
pub fn branch_from_ref(git_ref: &str) -> String {
    git_ref.splitn(3, '/').nth(2).unwrap_or(git_ref).to_string()
}

/// Escapes a message for a `::error::` workflow command.
#[must_use]
pub fn escape_command_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Host backed by the Actions runner environment and the GitHub REST API.
pub struct GithubHost {
    client: Client,
    api_url: String,
    repository: String,
    token: String,
    pull_request: PullRequest,
    output_path: Option<PathBuf>,
}

impl GithubHost {
    /// Reads the runner environment and event payload.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_EVENT_PATH` or `GITHUB_REPOSITORY` is
    /// unset, or the payload is not a pull request event.
    pub fn from_env(token: &str) -> Result<Self, String> {
        let event_path = env::var("GITHUB_EVENT_PATH")
            .map_err(|_| "GITHUB_EVENT_PATH is not set; not running in GitHub Actions?")?;
        let payload = std::fs::read_to_string(&event_path)
            .map_err(|e| format!("Failed to read event payload {event_path}: {e}"))?;
        let pull_request = parse_event(
            &payload,
            env::var("GITHUB_HEAD_REF").ok().as_deref(),
            env::var("GITHUB_REF").ok().as_deref(),
        )?;
        let repository =
            env::var("GITHUB_REPOSITORY").map_err(|_| "GITHUB_REPOSITORY is not set")?;

        Ok(Self {
            client: Client::new(),
            api_url: env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            repository,
            token: token.to_string(),
            pull_request,
            output_path: env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        })
    }

    /// Sends an authenticated JSON request and fails on a non-success status.
    async fn send(
        &self,
        method: reqwest::Method,
        url: String,
        body: serde_json::Value,
    ) -> Result<(), PortError> {
        debug!(%method, %url, "GitHub API request");
        let response = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| -> PortError { format!("GitHub request failed: {e}").into() })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(format!("GitHub API error ({}): {text}", status.as_u16()).into())
    }
}

impl ChangeRequestHost for GithubHost {
    fn event(&self) -> Result<ChangeRequestEvent, PortError> {
        Ok(self.pull_request.event.clone())
    }

    fn update_body(&self, body: &str) -> HostFuture<'_> {
        let url = format!(
            "{}/repos/{}/pulls/{}",
            self.api_url, self.repository, self.pull_request.number
        );
        let payload = json!({ "body": body });
        Box::pin(self.send(reqwest::Method::PATCH, url, payload))
    }

    fn post_comment(&self, comment: &str) -> HostFuture<'_> {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_url, self.repository, self.pull_request.number
        );
        let payload = json!({ "body": comment });
        Box::pin(self.send(reqwest::Method::POST, url, payload))
    }

    fn set_output(&self, name: &str, value: &str) -> Result<(), PortError> {
        let Some(path) = &self.output_path else {
            println!("::set-output name={name}::{}", escape_command_data(value));
            return Ok(());
        };
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if value.contains('\n') {
            writeln!(file, "{name}<<TICKETLINK_EOF\n{value}\nTICKETLINK_EOF")?;
        } else {
            writeln!(file, "{name}={value}")?;
        }
        Ok(())
    }

    fn fail(&self, message: &str) -> Result<(), PortError> {
        println!("::error::{}", escape_command_data(message));
        Ok(())
    }
}
