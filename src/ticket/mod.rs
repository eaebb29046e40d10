//! Ticket identifiers and the text-level operations over them.
//!
//! A ticket is the key of a work item in the issue tracker (`ABC-123`).
//! Tickets are pulled out of the title and branch name with an
//! [`ExtractionRule`], then the two resulting sets are compared by
//! [`reconcile`].

pub mod extract;
pub mod reconcile;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use extract::{extract, ExtractError, ExtractionRule, RuleError};
pub use reconcile::{reconcile, Reconciliation};

/// A normalized (upper-cased, trimmed) ticket key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Normalizes raw captured text into a ticket id.
    ///
    /// Returns `None` when nothing is left after trimming.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    /// The normalized key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique tickets in the order they were first seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketSet(Vec<TicketId>);

impl TicketSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ticket` unless already present. Returns whether it was added.
    pub fn insert(&mut self, ticket: TicketId) -> bool {
        if self.contains(&ticket) {
            return false;
        }
        self.0.push(ticket);
        true
    }

    /// Whether `ticket` is a member.
    #[must_use]
    pub fn contains(&self, ticket: &TicketId) -> bool {
        self.0.contains(ticket)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, TicketId> {
        self.0.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members joined by `sep`, in insertion order.
    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        self.0.iter().map(TicketId::as_str).collect::<Vec<_>>().join(sep)
    }
}

// Order is kept for iteration only; two sets are equal when they hold the same members.
impl PartialEq for TicketSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for TicketSet {}

impl FromIterator<TicketId> for TicketSet {
    fn from_iter<I: IntoIterator<Item = TicketId>>(iter: I) -> Self {
        let mut set = Self::new();
        for ticket in iter {
            set.insert(ticket);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TicketSet {
    type Item = &'a TicketId;
    type IntoIter = std::slice::Iter<'a, TicketId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TicketSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}

#[cfg(test)]
pub(crate) fn set(ids: &[&str]) -> TicketSet {
    ids.iter().filter_map(|id| TicketId::parse(id)).collect()
}
