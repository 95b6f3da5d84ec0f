//! Incremental ticket search.
//!
//! A search opens one session against a [`TicketSource`], polls it page by
//! page with exponential back-off on errors, deduplicates tickets as they
//! arrive, and serves a filtered, sorted, windowed view of everything found
//! so far.
//!
//! [`TicketSource`]: crate::search_api::TicketSource

mod accumulator;
mod config;
mod controller;
mod poller;
mod query;

pub use accumulator::TicketAccumulator;
pub use config::PollConfig;
pub use controller::{
    ControlError, SearchFailure, SearchStatus, SessionController, SessionSnapshot,
};
pub use poller::{PageSink, PollState, PollStep, Poller};
pub use query::{TicketView, query_tickets, visible_tickets};
