//! Pattern-based ticket extraction from a single text source.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::{TicketId, TicketSet};

/// Name of the capture group every rule must define.
pub const TICKET_GROUP: &str = "ticket";

/// A rule that cannot be compiled. Always a configuration defect.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The pattern source is not a valid regular expression.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// Pattern as configured.
        pattern: String,
        /// Compiler diagnostic.
        #[source]
        source: regex::Error,
    },
    /// A flag letter outside `dgimsuy`.
    #[error("unsupported regex flag {0:?} (supported: d, g, i, m, s, u, y)")]
    UnknownFlag(char),
    /// The pattern never defines the required named group.
    #[error("pattern {pattern:?} has no named group `{group}`")]
    MissingGroup {
        /// Pattern as configured.
        pattern: String,
        /// Required group name.
        group: String,
    },
}

/// Why a text produced no tickets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The pattern does not match the text at all.
    #[error("{text:?} does not match {pattern:?}")]
    NoMatch {
        /// Text that was searched.
        text: String,
        /// Pattern source.
        pattern: String,
    },
    /// The pattern matched but the named group captured nothing usable.
    #[error("{text:?} matches {pattern:?} but group `{group}` captured no ticket")]
    MissingCaptureGroup {
        /// Text that was searched.
        text: String,
        /// Pattern source.
        pattern: String,
        /// Group that came back absent or empty.
        group: String,
    },
}

/// A compiled pattern with its required group and optional multi-ticket delimiter.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    regex: Regex,
    pattern: String,
    flags: String,
    group: String,
    delimiter: Option<String>,
}

impl ExtractionRule {
    /// Compiles a rule capturing the [`TICKET_GROUP`] group.
    ///
    /// `flags` uses JavaScript flag letters; `g`, `u` and `d` are accepted and
    /// have no effect since only the first match is ever used. An empty
    /// `delimiter` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the pattern does not compile, a flag is
    /// unknown, or the pattern cannot produce the named group.
    pub fn new(pattern: &str, flags: &str, delimiter: Option<&str>) -> Result<Self, RuleError> {
        Self::with_group(pattern, flags, TICKET_GROUP, delimiter)
    }

    /// Compiles a rule capturing a custom group name.
    ///
    /// # Errors
    ///
    /// See [`ExtractionRule::new`].
    pub fn with_group(
        pattern: &str,
        flags: &str,
        group: &str,
        delimiter: Option<&str>,
    ) -> Result<Self, RuleError> {
        let (mut ignore_case, mut multi_line, mut dot_all, mut sticky) = (false, false, false, false);
        for flag in flags.chars() {
            match flag {
                'd' | 'g' | 'u' => {}
                'i' => ignore_case = true,
                'm' => multi_line = true,
                's' => dot_all = true,
                'y' => sticky = true,
                other => return Err(RuleError::UnknownFlag(other)),
            }
        }

        let source = if sticky { format!(r"\A(?:{pattern})") } else { pattern.to_string() };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(ignore_case)
            .multi_line(multi_line)
            .dot_matches_new_line(dot_all)
            .build()
            .map_err(|source| RuleError::InvalidPattern { pattern: pattern.to_string(), source })?;

        if !regex.capture_names().flatten().any(|name| name == group) {
            return Err(RuleError::MissingGroup {
                pattern: pattern.to_string(),
                group: group.to_string(),
            });
        }

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
            flags: flags.to_string(),
            group: group.to_string(),
            delimiter: delimiter.filter(|d| !d.is_empty()).map(str::to_string),
        })
    }

    /// Pattern source as configured.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Flag letters as configured.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Multi-ticket delimiter, if any.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }
}

/// Extracts the tickets named by the first match of `rule` in `text`.
///
/// Without a delimiter the captured text is the single ticket. With one, the
/// capture is split on it and every non-empty piece becomes a ticket;
/// repeated pieces collapse into one.
///
/// # Errors
///
/// [`ExtractError::NoMatch`] when the pattern does not match `text`, and
/// [`ExtractError::MissingCaptureGroup`] when it matches but the group is
/// absent or holds no ticket.
pub fn extract(text: &str, rule: &ExtractionRule) -> Result<TicketSet, ExtractError> {
    let captures = rule.regex.captures(text).ok_or_else(|| ExtractError::NoMatch {
        text: text.to_string(),
        pattern: rule.pattern.clone(),
    })?;

    let missing = || ExtractError::MissingCaptureGroup {
        text: text.to_string(),
        pattern: rule.pattern.clone(),
        group: rule.group.clone(),
    };

    let captured = captures.name(&rule.group).map(|m| m.as_str()).ok_or_else(missing)?;

    let tickets: TicketSet = match &rule.delimiter {
        Some(delimiter) => captured.split(delimiter.as_str()).filter_map(TicketId::parse).collect(),
        None => TicketId::parse(captured).into_iter().collect(),
    };

    if tickets.is_empty() {
        return Err(missing());
    }
    Ok(tickets)
}
