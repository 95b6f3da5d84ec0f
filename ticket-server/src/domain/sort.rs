//! Sort modes for the ticket list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::ticket::Ticket;

/// Error returned when parsing an unknown sort mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort mode: {0}")]
pub struct InvalidSortMode(String);

/// How the filtered ticket list is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Ascending price.
    #[default]
    Cheapest,
    /// Ascending total flight time.
    Fastest,
    /// Ascending blended score, see [`Ticket::optimal_score`].
    Optimal,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Cheapest => "cheapest",
            SortMode::Fastest => "fastest",
            SortMode::Optimal => "optimal",
        }
    }

    /// Compare two tickets under this mode.
    ///
    /// Equal keys compare `Equal`; callers rely on a stable sort to keep
    /// arrival order for ties.
    pub fn compare(&self, a: &Ticket, b: &Ticket) -> Ordering {
        match self {
            SortMode::Cheapest => a.price().cmp(&b.price()),
            SortMode::Fastest => a.total_duration_mins().cmp(&b.total_duration_mins()),
            SortMode::Optimal => a.optimal_score().total_cmp(&b.optimal_score()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = InvalidSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cheapest" => Ok(SortMode::Cheapest),
            "fastest" => Ok(SortMode::Fastest),
            "optimal" => Ok(SortMode::Optimal),
            other => Err(InvalidSortMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Carrier, Segment};
    use chrono::{TimeZone, Utc};

    fn ticket(price: u32, durations: &[u32]) -> Ticket {
        let date = Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap();
        let segments = durations
            .iter()
            .map(|&d| Segment::new("MOW", "HKT", date, d, vec![]).unwrap())
            .collect();
        Ticket::new(Carrier::parse("SU").unwrap(), price, segments).unwrap()
    }

    #[test]
    fn default_is_cheapest() {
        assert_eq!(SortMode::default(), SortMode::Cheapest);
    }

    #[test]
    fn cheapest_compares_price() {
        let a = ticket(100, &[600]);
        let b = ticket(200, &[60]);
        assert_eq!(SortMode::Cheapest.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn fastest_sums_segments() {
        // 300 + 300 vs 500
        let a = ticket(100, &[300, 300]);
        let b = ticket(200, &[500]);
        assert_eq!(SortMode::Fastest.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn optimal_blends_price_and_time() {
        // 10 + 10 = 20 vs 5 + 20 = 25
        let a = ticket(1_000, &[600]);
        let b = ticket(500, &[1_200]);
        assert_eq!(SortMode::Optimal.compare(&a, &b), Ordering::Less);

        // 1 + 1 = 2 both ways
        let c = ticket(100, &[60]);
        let d = ticket(100, &[60]);
        assert_eq!(SortMode::Optimal.compare(&c, &d), Ordering::Equal);
    }

    #[test]
    fn parse_modes() {
        assert_eq!("cheapest".parse::<SortMode>().unwrap(), SortMode::Cheapest);
        assert_eq!("fastest".parse::<SortMode>().unwrap(), SortMode::Fastest);
        assert_eq!("optimal".parse::<SortMode>().unwrap(), SortMode::Optimal);
        assert_eq!(
            "slowest".parse::<SortMode>().unwrap_err().to_string(),
            "unknown sort mode: slowest"
        );
    }
}
