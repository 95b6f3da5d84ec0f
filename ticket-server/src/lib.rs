//! Flight ticket search server.
//!
//! Opens a search session against the ticket API, polls it until the server
//! reports the search is complete, and serves a deduplicated, filtered and
//! sorted view of the tickets found so far.

pub mod config;
pub mod domain;
pub mod search;
pub mod search_api;
pub mod web;
