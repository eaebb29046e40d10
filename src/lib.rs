//! Core library entry for the `ticketlink` CLI.
//!
//! `ticketlink check` runs inside a GitHub Actions pull request workflow: it
//! pulls the Jira ticket out of the PR title and branch name, makes sure both
//! name the same tickets, confirms they exist in Jira, and turns the bare
//! mention in the PR body into a link.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod pipeline;
pub mod ports;
pub mod telemetry;
pub mod ticket;

use clap::Parser;
use tracing::Level;

/// Run the CLI with the provided arguments.
///
/// An optional `.env` file is loaded first so inputs can be given as
/// `INPUT_*` variables during local runs.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    dotenvy::dotenv().ok();
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    telemetry::init_tracing(cli.json, if cli.verbose { Level::DEBUG } else { Level::INFO });
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_executes_extract() {
        let result = run(["ticketlink", "extract", "--regex", r"(?<ticket>[A-Z]+-\d+)", "ABC-1"]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["ticketlink", "unknown"]);
        assert!(result.is_err());
    }
}
