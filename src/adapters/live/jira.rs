//! Live adapter for the `IssueTracker` port using the Jira Cloud REST API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::debug;

use crate::ports::{IssueTracker, LookupFuture, LookupResponse, PortError};
use crate::ticket::TicketId;

/// Jira tracker reached at `https://{domain}`.
pub struct JiraTracker {
    client: Client,
    domain: String,
    authorization: String,
}

impl JiraTracker {
    /// Creates a tracker for `domain`.
    ///
    /// `credential` is `user:api-token` and is only ever base64-encoded
    /// into the `Authorization` header.
    #[must_use]
    pub fn new(domain: &str, credential: &str) -> Self {
        Self {
            client: Client::new(),
            domain: domain.to_string(),
            authorization: format!("Basic {}", STANDARD.encode(credential)),
        }
    }

    /// Issue endpoint for `ticket`.
    #[must_use]
    pub fn issue_url(&self, ticket: &TicketId) -> String {
        format!("https://{}/rest/api/3/issue/{ticket}", self.domain)
    }
}

impl IssueTracker for JiraTracker {
    fn lookup(&self, ticket: &TicketId) -> LookupFuture<'_> {
        let url = self.issue_url(ticket);

        Box::pin(async move {
            debug!(%url, "GET issue");
            let response = self
                .client
                .get(&url)
                .header(AUTHORIZATION, &self.authorization)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| -> PortError { format!("Jira request failed: {e}").into() })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| -> PortError { format!("Failed to read Jira response: {e}").into() })?;

            Ok(LookupResponse { status, body })
        })
    }
}
