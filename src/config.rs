//! Validated configuration for one `check` run.

use std::fmt;

use thiserror::Error;

use crate::cli::CheckArgs;
use crate::ticket::{ExtractionRule, RuleError};

/// Placeholder replaced by the offending text in remediation templates.
pub const TEXT_PLACEHOLDER: &str = "%text%";

const DEFAULT_FLAGS: &str = "g";

/// Configuration problems. Reported before anything is read from the event.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required input is absent or empty.
    #[error("Input required and not supplied: {0}")]
    Missing(&'static str),
    /// A pattern input does not compile into a usable rule.
    #[error("Invalid {input}: {source}")]
    Rule {
        /// Name of the offending input.
        input: &'static str,
        /// Compilation failure.
        #[source]
        source: RuleError,
    },
}

/// Extraction rule for one text source plus its remediation template.
#[derive(Debug, Clone)]
pub struct SourceRule {
    /// Compiled rule.
    pub rule: ExtractionRule,
    /// Comment template with a `%text%` placeholder.
    pub comment: Option<String>,
}

impl SourceRule {
    /// Remediation text for `text`, when a template is configured.
    #[must_use]
    pub fn remediation(&self, text: &str) -> Option<String> {
        self.comment.as_ref().map(|template| template.replace(TEXT_PLACEHOLDER, text))
    }
}

/// Everything a run needs besides the event itself.
#[derive(Clone)]
pub struct Config {
    /// GitHub API token.
    pub github_token: String,
    /// Jira credential, sent base64-encoded as is.
    pub atlassian_token: String,
    /// Jira hostname.
    pub atlassian_domain: String,
    /// Rule for the PR title.
    pub title: SourceRule,
    /// Rule for the branch name.
    pub branch: SourceRule,
    /// Marker announcing the ticket in the body.
    pub body_ticket_prefix: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &"<redacted>")
            .field("atlassian_token", &"<redacted>")
            .field("atlassian_domain", &self.atlassian_domain)
            .field("title", &self.title)
            .field("branch", &self.branch)
            .field("body_ticket_prefix", &self.body_ticket_prefix)
            .finish()
    }
}

impl Config {
    /// Validates inputs and compiles both rules.
    ///
    /// Empty inputs count as absent. `ticket-regex` is accepted in place of
    /// `title-regex`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing required input or a pattern that
    /// cannot be used.
    pub fn from_args(args: &CheckArgs) -> Result<Self, ConfigError> {
        let title_regex = present(args.title_regex.as_deref())
            .or_else(|| present(args.ticket_regex.as_deref()))
            .ok_or(ConfigError::Missing("title-regex"))?;

        let title = ExtractionRule::new(
            title_regex,
            present(args.title_regex_flags.as_deref()).unwrap_or(DEFAULT_FLAGS),
            present(args.title_ticket_delimiter.as_deref()),
        )
        .map_err(|source| ConfigError::Rule { input: "title-regex", source })?;

        let branch = ExtractionRule::new(
            required(args.branch_name_regex.as_deref(), "branch-name-regex")?,
            present(args.branch_name_regex_flags.as_deref()).unwrap_or(DEFAULT_FLAGS),
            present(args.branch_name_ticket_delimiter.as_deref()),
        )
        .map_err(|source| ConfigError::Rule { input: "branch-name-regex", source })?;

        Ok(Self {
            github_token: required(args.github_token.as_deref(), "github-token")?.to_string(),
            atlassian_token: required(args.atlassian_token.as_deref(), "atlassian-token")?.to_string(),
            atlassian_domain: required(args.atlassian_domain.as_deref(), "atlassian-domain")?.to_string(),
            title: SourceRule {
                rule: title,
                comment: present(args.title_comment.as_deref()).map(str::to_string),
            },
            branch: SourceRule {
                rule: branch,
                comment: present(args.branch_name_comment.as_deref()).map(str::to_string),
            },
            body_ticket_prefix: present(args.body_ticket_prefix.as_deref()).map(str::to_string),
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    present(value).ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
pub(crate) fn sample_args() -> CheckArgs {
    CheckArgs {
        github_token: Some("gh-token".into()),
        atlassian_token: Some("me@example.com:secret".into()),
        atlassian_domain: Some("example.atlassian.net".into()),
        title_regex: Some(r"\((?<ticket>[A-Za-z]+-\d+)\)".into()),
        branch_name_regex: Some(r"^(?:feature/)?(?<ticket>[A-Za-z]+-\d+)".into()),
        ..CheckArgs::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_minimal_inputs() {
        let config = Config::from_args(&sample_args()).unwrap();
        assert_eq!(config.atlassian_domain, "example.atlassian.net");
        assert_eq!(config.title.rule.flags(), "g");
        assert!(config.title.rule.delimiter().is_none());
        assert!(config.body_ticket_prefix.is_none());
    }

    #[test]
    fn empty_input_counts_as_missing() {
        let args = CheckArgs { atlassian_domain: Some(String::new()), ..sample_args() };
        let err = Config::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("atlassian-domain")));
    }

    #[test]
    fn legacy_ticket_regex_is_accepted() {
        let args = CheckArgs {
            title_regex: None,
            ticket_regex: Some("(?<ticket>[A-Z]+-[0-9]+)".into()),
            ..sample_args()
        };
        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.title.rule.pattern(), "(?<ticket>[A-Z]+-[0-9]+)");
    }

    #[test]
    fn pattern_without_group_is_a_config_error() {
        let args = CheckArgs { branch_name_regex: Some("[A-Z]+-[0-9]+".into()), ..sample_args() };
        let err = Config::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Rule { input: "branch-name-regex", .. }));
    }

    #[test]
    fn remediation_substitutes_text() {
        let args = CheckArgs {
            title_comment: Some("Title `%text%` needs a ticket".into()),
            ..sample_args()
        };
        let config = Config::from_args(&args).unwrap();
        assert_eq!(
            config.title.remediation("Fix login").as_deref(),
            Some("Title `Fix login` needs a ticket")
        );
        assert_eq!(config.branch.remediation("main"), None);
    }

    #[test]
    fn debug_redacts_tokens() {
        let config = Config::from_args(&sample_args()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("gh-token"));
    }
}
