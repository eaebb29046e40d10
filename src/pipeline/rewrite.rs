//! Idempotent linking of ticket mentions in the pull request body.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::ticket::{TicketId, TicketSet};

/// The body uses the prefix convention but does not name the ticket after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("body contains {prefix:?} but not {prefix}{ticket}")]
pub struct TicketMissingInBody {
    /// Ticket expected after the prefix.
    pub ticket: TicketId,
    /// Configured prefix.
    pub prefix: String,
}

/// Substitutions applied to a body, and the body they produce.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RewritePlan {
    /// `(raw mention, hyperlinked form)` pairs in the order applied.
    pub substitutions: Vec<(String, String)>,
    /// Body after every substitution.
    pub body: String,
}

/// Markdown inline links, `[text](target)`.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]\n]*\]\([^)\s]*\)").expect("MARKDOWN_LINK is a valid regex pattern")
});

/// Markdown link from a ticket to its tracker page.
#[must_use]
pub fn hyperlink(ticket: &TicketId, domain: &str) -> String {
    format!("[{ticket}](https://{domain}/browse/{ticket})")
}

/// Links the first bare mention of `ticket` in `body`.
///
/// A mention is bare when it is not part of a longer id and sits outside any
/// Markdown link. Returns `body` unchanged when it already holds the link or
/// has no bare mention.
#[must_use]
pub fn rewrite(body: &str, ticket: &TicketId, domain: &str) -> String {
    let link = hyperlink(ticket, domain);
    if body.contains(&link) {
        return body.to_string();
    }
    match bare_mention(body, ticket.as_str()) {
        Some(at) => format!("{}{link}{}", &body[..at], &body[at + ticket.as_str().len()..]),
        None => body.to_string(),
    }
}

/// Byte offset of the first standalone `ticket` outside a Markdown link.
fn bare_mention(body: &str, ticket: &str) -> Option<usize> {
    let links: Vec<Range<usize>> = MARKDOWN_LINK.find_iter(body).map(|m| m.range()).collect();
    body.match_indices(ticket).map(|(at, _)| at).find(|&at| {
        let end = at + ticket.len();
        let joined_before = body[..at].chars().next_back().is_some_and(|c| c.is_ascii_alphanumeric());
        let joined_after = body[end..].chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
        !joined_before && !joined_after && !links.iter().any(|span| span.contains(&at))
    })
}

/// Plans the rewrite of `body` for every ticket, in set order.
///
/// With a `prefix`, a body that lacks it entirely is left alone, and a body
/// that has it must name every ticket right after it (whitespace and an
/// existing link are allowed).
///
/// # Errors
///
/// Returns [`TicketMissingInBody`] for the first ticket the prefix does not announce.
pub fn plan(
    body: &str,
    tickets: &TicketSet,
    domain: &str,
    prefix: Option<&str>,
) -> Result<RewritePlan, TicketMissingInBody> {
    if let Some(prefix) = prefix {
        if !body.contains(prefix) {
            return Ok(RewritePlan { substitutions: Vec::new(), body: body.to_string() });
        }
        if let Some(ticket) = tickets.iter().find(|t| !announces(body, prefix, t, domain)) {
            return Err(TicketMissingInBody { ticket: ticket.clone(), prefix: prefix.to_string() });
        }
    }

    let mut plan = RewritePlan { substitutions: Vec::new(), body: body.to_string() };
    for ticket in tickets {
        let rewritten = rewrite(&plan.body, ticket, domain);
        if rewritten != plan.body {
            plan.substitutions.push((ticket.to_string(), hyperlink(ticket, domain)));
            plan.body = rewritten;
        }
    }
    Ok(plan)
}

/// Whether some occurrence of `prefix` is followed by `ticket` or its link.
fn announces(body: &str, prefix: &str, ticket: &TicketId, domain: &str) -> bool {
    let link = hyperlink(ticket, domain);
    body.match_indices(prefix).any(|(at, _)| {
        let rest = body[at + prefix.len()..].trim_start();
        let named = rest.strip_prefix(ticket.as_str()).is_some_and(|after| {
            !after.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        });
        named || rest.starts_with(&link)
    })
}
