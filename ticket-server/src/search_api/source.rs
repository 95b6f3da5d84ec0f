//! The ticket source abstraction.

use std::fmt;
use std::future::Future;

use crate::domain::Ticket;

use super::error::SearchApiError;

/// Opaque search session token.
///
/// Obtained once per search lifecycle; never reused for a new search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One page of results for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Tickets in this page, possibly including ones seen before.
    pub tickets: Vec<Ticket>,

    /// Whether the server has finished producing results.
    pub done: bool,
}

impl Page {
    /// An empty page that is not final.
    ///
    /// This is what a transient server error mid-stream turns into.
    pub fn pending() -> Self {
        Self::default()
    }
}

/// Trait for anything that can serve a paged ticket search.
///
/// This abstraction lets the polling engine and session controller run
/// against the live API or a scripted source.
pub trait TicketSource: Send + Sync + 'static {
    /// Open a new search session.
    fn open_session(&self) -> impl Future<Output = Result<SessionId, SearchApiError>> + Send;

    /// Fetch the next page of results for `session`.
    fn fetch_page(
        &self,
        session: &SessionId,
    ) -> impl Future<Output = Result<Page, SearchApiError>> + Send;
}
