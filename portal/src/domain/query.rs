//! Latest-wins bookkeeping for screen fetches.
//!
//! A screen takes a [`QueryTicket`] before each fetch and asks the slot
//! whether the ticket is still current once the fetch completes. Only the
//! most recently issued ticket is current, so out-of-order completions are
//! dropped. Cancelling the slot (for example when a screen unmounts) makes
//! every outstanding ticket stale.

use std::sync::atomic::{AtomicU64, Ordering};

/// Proof that a fetch was issued at a particular point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// Monotonic ticket dispenser for one logical query.
///
/// # Examples
/// ```
/// use portal::domain::LatestQuery;
///
/// let slot = LatestQuery::default();
/// let first = slot.issue();
/// let second = slot.issue();
/// assert!(!slot.is_current(first));
/// assert!(slot.is_current(second));
///
/// slot.cancel();
/// assert!(!slot.is_current(second));
/// ```
#[derive(Debug, Default)]
pub struct LatestQuery {
    latest: AtomicU64,
}

impl LatestQuery {
    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Return `true` if `ticket` is the most recently issued one.
    #[must_use]
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fresh_ticket_is_current() {
        let slot = LatestQuery::default();
        let ticket = slot.issue();
        assert!(slot.is_current(ticket));
    }

    #[rstest]
    fn later_tickets_supersede_earlier_ones() {
        let slot = LatestQuery::default();
        let tickets: Vec<_> = (0..4).map(|_| slot.issue()).collect();
        let (last, earlier) = tickets.split_last().expect("four tickets");
        assert!(slot.is_current(*last));
        assert!(earlier.iter().all(|ticket| !slot.is_current(*ticket)));
    }

    #[rstest]
    fn cancel_invalidates_outstanding_and_allows_new_tickets() {
        let slot = LatestQuery::default();
        let pending = slot.issue();
        slot.cancel();
        assert!(!slot.is_current(pending));

        let next = slot.issue();
        assert!(slot.is_current(next));
    }
}
