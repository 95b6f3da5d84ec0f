//! Web layer for the ticket search.
//!
//! Exposes the search session as a small JSON API: start and stop a search,
//! read the visible tickets, and change the filter, sort and window.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
