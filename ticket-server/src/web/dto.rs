//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Segment, StopFilter, StopFlag, Ticket};
use crate::search::SessionSnapshot;

/// Query for `POST /tickets/more`.
#[derive(Debug, Deserialize)]
pub struct GrowRequest {
    /// How many more tickets to reveal (defaults to 5).
    pub by: Option<usize>,
}

/// Body for `PUT /filters`.
#[derive(Debug, Deserialize)]
pub struct SetFilterRequest {
    /// One of `direct`, `oneStop`, `twoStops`, `threeStops`.
    pub flag: String,
    pub value: bool,
}

/// Body for `PUT /sort`.
#[derive(Debug, Deserialize)]
pub struct SetSortRequest {
    /// One of `cheapest`, `fastest`, `optimal`.
    pub mode: String,
}

/// Response to `POST /search`.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// False if a search was already running.
    pub started: bool,
    pub status: &'static str,
}

/// Current filter checkboxes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub all: bool,
    pub direct: bool,
    pub one_stop: bool,
    pub two_stops: bool,
    pub three_stops: bool,
}

impl From<StopFilter> for FilterResult {
    fn from(filter: StopFilter) -> Self {
        Self {
            all: filter.all(),
            direct: filter.is_enabled(StopFlag::Direct),
            one_stop: filter.is_enabled(StopFlag::OneStop),
            two_stops: filter.is_enabled(StopFlag::TwoStops),
            three_stops: filter.is_enabled(StopFlag::ThreeStops),
        }
    }
}

/// A segment in the ticket list.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub origin: String,
    pub destination: String,
    /// Departure, RFC 3339 UTC.
    pub date: String,
    /// Minutes.
    pub duration: u32,
    pub stops: Vec<String>,
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            origin: segment.origin().to_string(),
            destination: segment.destination().to_string(),
            date: segment.date().to_rfc3339(),
            duration: segment.duration_mins(),
            stops: segment.stops().to_vec(),
        }
    }
}

/// A ticket in the ticket list (same shape as the upstream API).
#[derive(Debug, Serialize)]
pub struct TicketResult {
    pub carrier: String,
    pub price: u32,
    pub segments: Vec<SegmentResult>,
}

impl TicketResult {
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            carrier: ticket.carrier().to_string(),
            price: ticket.price(),
            segments: ticket
                .segments()
                .iter()
                .map(SegmentResult::from_segment)
                .collect(),
        }
    }
}

/// Response to `GET /tickets`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsResponse {
    pub status: &'static str,
    pub error: Option<String>,
    pub tickets: Vec<TicketResult>,
    /// Tickets passing the filter, revealed or not.
    pub matching: usize,
    /// Distinct tickets found so far.
    pub total: usize,
    pub display_window: usize,
    pub sort: &'static str,
    pub filters: FilterResult,
}

impl TicketsResponse {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            status: snapshot.status.as_str(),
            error: snapshot.error.clone(),
            tickets: snapshot
                .tickets
                .iter()
                .map(|t| TicketResult::from_ticket(t))
                .collect(),
            matching: snapshot.matching,
            total: snapshot.total,
            display_window: snapshot.display_window,
            sort: snapshot.sort.as_str(),
            filters: snapshot.filter.into(),
        }
    }
}

/// Response to `POST /tickets/more`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowResponse {
    pub display_window: usize,
}

/// Response to `PUT /sort`.
#[derive(Debug, Serialize)]
pub struct SortResponse {
    pub sort: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
