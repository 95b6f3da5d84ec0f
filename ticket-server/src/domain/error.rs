//! Domain error types.
//!
//! These errors represent validation failures when building tickets from
//! raw search results. They are distinct from API/IO errors.

/// Domain-level errors for ticket validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Carrier code is empty or blank
    #[error("carrier code must not be empty")]
    EmptyCarrier,

    /// Price is zero or negative
    #[error("price must be positive, got {0}")]
    NonPositivePrice(i64),

    /// Ticket has no segments
    #[error("ticket must have at least one segment")]
    NoSegments,

    /// Segment duration is negative or too large
    #[error("invalid segment duration: {0} minutes")]
    InvalidDuration(i64),

    /// Segment departure timestamp could not be parsed
    #[error("invalid departure date: {0}")]
    InvalidDate(String),

    /// Origin or destination code is empty
    #[error("segment {0} code must not be empty")]
    EmptyAirport(&'static str),
}
