//! Tickets and their flight segments.
//!
//! A [`Ticket`] is immutable once built. Its derived `Eq` and `Hash` are the
//! structural identity used for deduplication: carrier, price and every
//! segment's (date, origin, destination, duration, stops) must match, with
//! stops compared in order.

use std::fmt;

use chrono::{DateTime, Utc};

use super::error::DomainError;

/// Airline carrier code (e.g. "SU", "S7").
///
/// # Examples
///
/// ```
/// use ticket_server::domain::Carrier;
///
/// let su = Carrier::parse(" SU ").unwrap();
/// assert_eq!(su.as_str(), "SU");
///
/// assert!(Carrier::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Carrier(String);

impl Carrier {
    /// Parse a carrier code, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyCarrier);
        }
        Ok(Carrier(trimmed.to_string()))
    }

    /// Returns the carrier code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Carrier({})", self.0)
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One flight segment of a ticket (e.g. the outbound leg).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    origin: String,
    destination: String,
    date: DateTime<Utc>,
    duration_mins: u32,
    stops: Vec<String>,
}

impl Segment {
    /// Create a segment, rejecting empty origin/destination codes.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: DateTime<Utc>,
        duration_mins: u32,
        stops: Vec<String>,
    ) -> Result<Self, DomainError> {
        let origin = origin.into();
        let destination = destination.into();

        if origin.trim().is_empty() {
            return Err(DomainError::EmptyAirport("origin"));
        }
        if destination.trim().is_empty() {
            return Err(DomainError::EmptyAirport("destination"));
        }

        Ok(Self {
            origin,
            destination,
            date,
            duration_mins,
            stops,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Departure instant.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn duration_mins(&self) -> u32 {
        self.duration_mins
    }

    /// Intermediate stop codes, in flight order.
    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}

/// A bookable itinerary returned by the search API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    carrier: Carrier,
    price: u32,
    segments: Vec<Segment>,
}

impl Ticket {
    /// Create a ticket. Price must be positive and there must be at least
    /// one segment.
    pub fn new(carrier: Carrier, price: u32, segments: Vec<Segment>) -> Result<Self, DomainError> {
        if price == 0 {
            return Err(DomainError::NonPositivePrice(0));
        }
        if segments.is_empty() {
            return Err(DomainError::NoSegments);
        }

        Ok(Self {
            carrier,
            price,
            segments,
        })
    }

    pub fn carrier(&self) -> &Carrier {
        &self.carrier
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The largest stop count across all segments.
    ///
    /// This is what the stop filter matches on: a ticket with a direct
    /// outbound and a two-stop return counts as a two-stop ticket.
    pub fn max_stops(&self) -> usize {
        self.segments
            .iter()
            .map(Segment::stop_count)
            .max()
            .unwrap_or(0)
    }

    /// Sum of all segment durations in minutes.
    pub fn total_duration_mins(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| u64::from(s.duration_mins))
            .sum()
    }

    /// Blended price/time score used by the "optimal" sort.
    ///
    /// Hundreds of currency units plus hours of flying; lower is better.
    pub fn optimal_score(&self) -> f64 {
        f64::from(self.price) / 100.0 + self.total_duration_mins() as f64 / 60.0
    }
}
