//! Ticket search API client.
//!
//! This module provides the two remote operations the search needs: open a
//! session, then fetch pages of results for it until the server says it is
//! done.
//!
//! Key characteristics of the API:
//! - There is no ticket identifier; the same ticket can appear in several
//!   pages and must be deduplicated structurally
//! - `/tickets` returns HTTP 500 intermittently as part of normal operation
//! - Payload shapes are not guaranteed, so pages are normalized on arrival

mod client;
mod convert;
mod error;
mod scripted;
mod source;
mod types;

pub use client::{DEFAULT_BASE_URL, SearchClient, SearchClientConfig};
pub use convert::{ConversionError, convert_payload, convert_ticket, convert_value};
pub use error::{SearchApiError, TransportError};
pub use scripted::{ScriptStep, ScriptedSource};
pub use source::{Page, SessionId, TicketSource};
pub use types::{RawSegment, RawTicket, SearchIdResponse, TicketsPayload};

/// The ticket source the server binary runs against.
///
/// Either the live HTTP API or a scripted fixture, picked at startup.
#[derive(Debug)]
pub enum Backend {
    Http(SearchClient),
    Scripted(ScriptedSource),
}

impl TicketSource for Backend {
    async fn open_session(&self) -> Result<SessionId, SearchApiError> {
        match self {
            Backend::Http(client) => client.open_session().await,
            Backend::Scripted(source) => source.open_session().await,
        }
    }

    async fn fetch_page(&self, session: &SessionId) -> Result<Page, SearchApiError> {
        match self {
            Backend::Http(client) => client.fetch_page(session).await,
            Backend::Scripted(source) => source.fetch_page(session).await,
        }
    }
}
