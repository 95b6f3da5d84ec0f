//! Deduplicating ticket accumulator.
//!
//! The API has no ticket identifier and repeats tickets across pages, so
//! tickets are deduplicated on their structural identity (the derived
//! `Eq`/`Hash` of [`Ticket`]). A hash index keeps each merge O(1) amortized
//! per candidate.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::Ticket;

/// The growing set of known tickets for one search lifecycle.
#[derive(Debug, Default)]
pub struct TicketAccumulator {
    /// Tickets in first-seen order.
    tickets: Vec<Arc<Ticket>>,

    /// Same tickets, for membership checks.
    index: HashSet<Arc<Ticket>>,
}

impl TicketAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge candidate tickets, returning the ones not seen before.
    ///
    /// New tickets are appended in candidate order. A ticket repeated
    /// within `candidates` is only counted once.
    pub fn merge(&mut self, candidates: impl IntoIterator<Item = Ticket>) -> Vec<Arc<Ticket>> {
        let mut added = Vec::new();

        for candidate in candidates {
            if self.index.contains(&candidate) {
                continue;
            }
            let ticket = Arc::new(candidate);
            self.index.insert(Arc::clone(&ticket));
            self.tickets.push(Arc::clone(&ticket));
            added.push(ticket);
        }

        added
    }

    /// All known tickets in arrival order.
    pub fn all(&self) -> &[Arc<Ticket>] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Forget every ticket (a new search starts from scratch).
    pub fn clear(&mut self) {
        self.tickets.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Carrier, Segment};
    use chrono::{TimeZone, Utc};

    fn ticket(price: u32, stops: &[&str]) -> Ticket {
        let date = Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
        let segment = Segment::new(
            "MOW",
            "HKT",
            date,
            600,
            stops.iter().map(|s| (*s).to_string()).collect(),
        )
        .unwrap();
        Ticket::new(Carrier::parse("SU").unwrap(), price, vec![segment]).unwrap()
    }

    #[test]
    fn merge_returns_only_new() {
        let mut acc = TicketAccumulator::new();

        let added = acc.merge(vec![ticket(100, &[]), ticket(200, &[])]);
        assert_eq!(added.len(), 2);

        let added = acc.merge(vec![ticket(200, &[]), ticket(300, &[])]);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].price(), 300);

        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn same_ticket_twice_held_once() {
        let mut acc = TicketAccumulator::new();
        acc.merge(vec![ticket(100, &["HKG"])]);
        acc.merge(vec![ticket(100, &["HKG"])]);

        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn duplicates_within_one_batch_collapse() {
        let mut acc = TicketAccumulator::new();
        let added = acc.merge(vec![ticket(100, &[]), ticket(100, &[]), ticket(100, &[])]);

        assert_eq!(added.len(), 1);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn stop_order_distinguishes_tickets() {
        let mut acc = TicketAccumulator::new();
        acc.merge(vec![ticket(100, &["HKG", "DXB"])]);
        let added = acc.merge(vec![ticket(100, &["DXB", "HKG"])]);

        assert_eq!(added.len(), 1);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn preserves_arrival_order() {
        let mut acc = TicketAccumulator::new();
        acc.merge(vec![ticket(300, &[]), ticket(100, &[])]);
        acc.merge(vec![ticket(200, &[]), ticket(300, &[])]);

        let prices: Vec<u32> = acc.all().iter().map(|t| t.price()).collect();
        assert_eq!(prices, vec![300, 100, 200]);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut acc = TicketAccumulator::new();
        acc.merge(vec![ticket(100, &[])]);
        acc.clear();

        assert!(acc.is_empty());
        assert_eq!(acc.merge(vec![ticket(100, &[])]).len(), 1);
    }
}
