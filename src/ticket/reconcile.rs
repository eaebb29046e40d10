//! Consistency check between tickets found in two independent sources.

use super::TicketSet;

/// Result of comparing two ticket sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Both sources name exactly the same tickets.
    Consistent(TicketSet),
    /// The sources disagree.
    Inconsistent {
        /// Tickets only the left-hand source names.
        left_only: TicketSet,
        /// Tickets only the right-hand source names.
        right_only: TicketSet,
    },
}

impl Reconciliation {
    /// Whether the sets matched.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent(_))
    }
}

/// Compares `left` and `right` as sets.
///
/// On a match the left-hand set is returned, so its extraction order drives
/// every later stage. Otherwise both one-sided differences are reported.
#[must_use]
pub fn reconcile(left: &TicketSet, right: &TicketSet) -> Reconciliation {
    let left_only: TicketSet = left.iter().filter(|t| !right.contains(t)).cloned().collect();
    let right_only: TicketSet = right.iter().filter(|t| !left.contains(t)).cloned().collect();

    if left_only.is_empty() && right_only.is_empty() {
        Reconciliation::Consistent(left.clone())
    } else {
        Reconciliation::Inconsistent { left_only, right_only }
    }
}
