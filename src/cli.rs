//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `ticketlink`.
#[derive(Debug, Parser)]
#[command(
    name = "ticketlink",
    version,
    about = "Check pull request tickets against Jira and link them in the body"
)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines.
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full check against the triggering pull request.
    Check(CheckArgs),
    /// Extract tickets from a piece of text with a pattern.
    Extract {
        /// Pattern with a named `ticket` group.
        #[arg(long)]
        regex: String,
        /// JavaScript-style flag letters.
        #[arg(long, default_value = "g")]
        flags: String,
        /// Split the captured text into several tickets on this string.
        #[arg(long)]
        delimiter: Option<String>,
        /// Text to search.
        text: String,
    },
}

/// Action inputs for `check`.
///
/// Each input also reads the `INPUT_*` variable the Actions runner sets for it.
#[derive(Debug, Default, Args)]
pub struct CheckArgs {
    /// Token for the GitHub API.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Jira credential as `user:api-token`.
    #[arg(long, env = "INPUT_ATLASSIAN-TOKEN", hide_env_values = true)]
    pub atlassian_token: Option<String>,

    /// Jira hostname, e.g. `example.atlassian.net`.
    #[arg(long, env = "INPUT_ATLASSIAN-DOMAIN")]
    pub atlassian_domain: Option<String>,

    /// Pattern applied to the PR title.
    #[arg(long, env = "INPUT_TITLE-REGEX")]
    pub title_regex: Option<String>,

    /// Older name of `--title-regex`.
    #[arg(long, env = "INPUT_TICKET-REGEX", hide = true)]
    pub ticket_regex: Option<String>,

    /// Flags for the title pattern.
    #[arg(long, env = "INPUT_TITLE-REGEX-FLAGS")]
    pub title_regex_flags: Option<String>,

    /// Delimiter between several tickets in the title.
    #[arg(long, env = "INPUT_TITLE-TICKET-DELIMITER")]
    pub title_ticket_delimiter: Option<String>,

    /// Comment posted when the title has no ticket; `%text%` is the title.
    #[arg(long, env = "INPUT_TITLE-COMMENT")]
    pub title_comment: Option<String>,

    /// Pattern applied to the branch name.
    #[arg(long, env = "INPUT_BRANCH-NAME-REGEX")]
    pub branch_name_regex: Option<String>,

    /// Flags for the branch pattern.
    #[arg(long, env = "INPUT_BRANCH-NAME-REGEX-FLAGS")]
    pub branch_name_regex_flags: Option<String>,

    /// Delimiter between several tickets in the branch name.
    #[arg(long, env = "INPUT_BRANCH-NAME-TICKET-DELIMITER")]
    pub branch_name_ticket_delimiter: Option<String>,

    /// Comment posted when the branch has no ticket; `%text%` is the branch name.
    #[arg(long, env = "INPUT_BRANCH-NAME-COMMENT")]
    pub branch_name_comment: Option<String>,

    /// Marker announcing the ticket in the PR body.
    #[arg(long, env = "INPUT_BODY-TICKET-PREFIX")]
    pub body_ticket_prefix: Option<String>,

    /// Serve host and tracker calls from a cassette file or directory.
    #[arg(long)]
    pub replay: Option<PathBuf>,
}
