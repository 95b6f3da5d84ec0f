//! The filtered, sorted, paginated ticket view.
//!
//! Everything here is a pure function of its inputs. The controller may
//! memoize results, but recomputing from scratch always gives the same
//! answer.

use std::sync::Arc;

use crate::domain::{SortMode, StopFilter, Ticket};

/// Result of running the query: the revealed tickets plus how many matched
/// the filter in total (so the consumer knows whether "show more" helps).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    /// The first `window` matching tickets in sort order.
    pub tickets: Vec<Arc<Ticket>>,

    /// Number of tickets that passed the filter.
    pub matching: usize,
}

/// Filter, sort and take the first `window` tickets.
///
/// 1. Keep tickets whose busiest segment's stop count is enabled in
///    `filter` (more than three stops is never enabled).
/// 2. Stable-sort by `mode`, so ties keep arrival order.
/// 3. Truncate to `window`.
pub fn query_tickets(
    tickets: &[Arc<Ticket>],
    filter: &StopFilter,
    mode: SortMode,
    window: usize,
) -> TicketView {
    let mut matching: Vec<Arc<Ticket>> = tickets
        .iter()
        .filter(|t| filter.admits(t.max_stops()))
        .cloned()
        .collect();

    matching.sort_by(|a, b| mode.compare(a, b));

    let total = matching.len();
    matching.truncate(window);

    TicketView {
        tickets: matching,
        matching: total,
    }
}

/// Just the revealed tickets; see [`query_tickets`].
pub fn visible_tickets(
    tickets: &[Arc<Ticket>],
    filter: &StopFilter,
    mode: SortMode,
    window: usize,
) -> Vec<Arc<Ticket>> {
    query_tickets(tickets, filter, mode, window).tickets
}
