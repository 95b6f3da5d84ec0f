//! Conversion from search API DTOs to domain types.
//!
//! Page payloads are normalized rather than rejected: a non-array ticket
//! list becomes an empty page, a non-boolean stop flag becomes `false`, and
//! individual tickets that fail validation are skipped with a warning.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use crate::domain::{Carrier, DomainError, Segment, Ticket};

use super::source::Page;
use super::types::{RawSegment, RawTicket, TicketsPayload};

/// Error converting a single raw ticket.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// The JSON value does not have the ticket shape
    #[error("malformed ticket: {0}")]
    Shape(String),

    /// The ticket has the right shape but invalid values
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Convert a `/tickets` payload into a page.
pub fn convert_payload(payload: TicketsPayload) -> Page {
    let done = payload.stop.as_bool().unwrap_or(false);

    let raw_tickets = match payload.tickets {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => Vec::new(),
        other => {
            warn!(kind = json_kind(&other), "ticket list is not an array, treating page as empty");
            Vec::new()
        }
    };

    let mut tickets = Vec::with_capacity(raw_tickets.len());
    for (idx, value) in raw_tickets.into_iter().enumerate() {
        match convert_value(value) {
            Ok(ticket) => tickets.push(ticket),
            Err(e) => warn!(index = idx, error = %e, "skipping ticket"),
        }
    }

    Page { tickets, done }
}

/// Convert one JSON value into a ticket.
pub fn convert_value(value: serde_json::Value) -> Result<Ticket, ConversionError> {
    let raw: RawTicket =
        serde_json::from_value(value).map_err(|e| ConversionError::Shape(e.to_string()))?;
    convert_ticket(&raw)
}

/// Convert a raw ticket into a validated [`Ticket`].
pub fn convert_ticket(raw: &RawTicket) -> Result<Ticket, ConversionError> {
    let carrier = Carrier::parse(&raw.carrier)?;

    let price = u32::try_from(raw.price)
        .ok()
        .filter(|&p| p > 0)
        .ok_or(DomainError::NonPositivePrice(raw.price))?;

    let segments = raw
        .segments
        .iter()
        .map(convert_segment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Ticket::new(carrier, price, segments)?)
}

fn convert_segment(raw: &RawSegment) -> Result<Segment, DomainError> {
    let date = parse_date(&raw.date)?;
    let duration =
        u32::try_from(raw.duration).map_err(|_| DomainError::InvalidDuration(raw.duration))?;

    Segment::new(
        raw.origin.clone(),
        raw.destination.clone(),
        date,
        duration,
        raw.stops.clone(),
    )
}

/// Parse a departure timestamp.
///
/// The API sends RFC 3339 (e.g. `2024-05-04T12:00:00.000Z`). Timestamps
/// without an offset are taken as UTC.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
