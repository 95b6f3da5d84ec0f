//! Search API response DTOs.
//!
//! These types map directly to the JSON returned by the ticket search API.
//! The page payload is deliberately loose (`serde_json::Value`) because the
//! API is known to send odd shapes mid-stream; `convert` normalizes them.

use serde::Deserialize;

/// Response from `GET /search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIdResponse {
    /// Opaque session token for subsequent `/tickets` calls.
    pub search_id: String,
}

/// Response from `GET /tickets?searchId=...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketsPayload {
    /// Expected to be an array of [`RawTicket`]; anything else is treated
    /// as an empty page.
    #[serde(default)]
    pub tickets: serde_json::Value,

    /// Completion flag; anything other than a JSON boolean means "not done".
    #[serde(default)]
    pub stop: serde_json::Value,
}

/// A ticket as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTicket {
    /// Price in currency units.
    pub price: i64,

    /// IATA carrier code.
    pub carrier: String,

    /// Flight segments (usually outbound and return).
    pub segments: Vec<RawSegment>,
}

/// A segment as sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSegment {
    /// Origin city/airport code.
    pub origin: String,

    /// Destination city/airport code.
    pub destination: String,

    /// Departure timestamp (ISO 8601, usually UTC with milliseconds).
    pub date: String,

    /// Flight time in minutes.
    pub duration: i64,

    /// Transfer airport codes.
    #[serde(default)]
    pub stops: Vec<String>,
}
