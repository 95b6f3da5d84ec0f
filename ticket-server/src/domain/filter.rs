//! Stop-count filter selection.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown filter flag name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stop filter: {0}")]
pub struct InvalidStopFlag(String);

/// One of the four stop-count checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopFlag {
    Direct,
    OneStop,
    TwoStops,
    ThreeStops,
}

impl StopFlag {
    /// All flags in stop-count order.
    pub const ALL: [StopFlag; 4] = [
        StopFlag::Direct,
        StopFlag::OneStop,
        StopFlag::TwoStops,
        StopFlag::ThreeStops,
    ];

    /// The flag covering tickets with exactly `stops` stops.
    ///
    /// Returns `None` above three stops: no checkbox covers those tickets,
    /// so they never pass the filter.
    pub fn for_stop_count(stops: usize) -> Option<Self> {
        Self::ALL.get(stops).copied()
    }

    /// Wire name, as used by the HTTP layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopFlag::Direct => "direct",
            StopFlag::OneStop => "oneStop",
            StopFlag::TwoStops => "twoStops",
            StopFlag::ThreeStops => "threeStops",
        }
    }
}

impl fmt::Display for StopFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopFlag {
    type Err = InvalidStopFlag;

    /// Accepts the camelCase wire names and their snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(StopFlag::Direct),
            "oneStop" | "one_stop" => Ok(StopFlag::OneStop),
            "twoStops" | "two_stops" => Ok(StopFlag::TwoStops),
            "threeStops" | "three_stops" => Ok(StopFlag::ThreeStops),
            other => Err(InvalidStopFlag(other.to_string())),
        }
    }
}

/// Which stop counts are currently shown.
///
/// The "all" checkbox is not stored: [`StopFilter::all`] derives it from the
/// four stop-count flags, so it cannot drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StopFilter {
    enabled: [bool; 4],
}

impl StopFilter {
    /// Every stop count enabled.
    pub fn all_enabled() -> Self {
        Self { enabled: [true; 4] }
    }

    /// Build from explicit flag values.
    pub fn new(direct: bool, one_stop: bool, two_stops: bool, three_stops: bool) -> Self {
        Self {
            enabled: [direct, one_stop, two_stops, three_stops],
        }
    }

    pub fn is_enabled(&self, flag: StopFlag) -> bool {
        self.enabled[flag as usize]
    }

    /// True iff all four stop-count flags are enabled.
    pub fn all(&self) -> bool {
        self.enabled.iter().all(|&on| on)
    }

    pub fn set(&mut self, flag: StopFlag, value: bool) {
        self.enabled[flag as usize] = value;
    }

    pub fn toggle(&mut self, flag: StopFlag) {
        let idx = flag as usize;
        self.enabled[idx] = !self.enabled[idx];
    }

    /// Flip the "all" checkbox: every flag takes the negation of the
    /// current `all()` value.
    pub fn toggle_all(&mut self) {
        *self = if self.all() {
            Self::new(false, false, false, false)
        } else {
            Self::all_enabled()
        };
    }

    /// Whether a ticket whose busiest segment has `stops` stops is shown.
    pub fn admits(&self, stops: usize) -> bool {
        StopFlag::for_stop_count(stops).is_some_and(|flag| self.is_enabled(flag))
    }
}

impl Default for StopFilter {
    /// Direct, one-stop and two-stop shown; three-stop hidden.
    fn default() -> Self {
        Self::new(true, true, true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selection() {
        let filter = StopFilter::default();
        assert!(filter.is_enabled(StopFlag::Direct));
        assert!(filter.is_enabled(StopFlag::OneStop));
        assert!(filter.is_enabled(StopFlag::TwoStops));
        assert!(!filter.is_enabled(StopFlag::ThreeStops));
        assert!(!filter.all());
    }

    #[test]
    fn toggling_last_flag_enables_all() {
        let mut filter = StopFilter::default();
        filter.toggle(StopFlag::ThreeStops);
        assert!(filter.all());

        filter.toggle(StopFlag::Direct);
        assert!(!filter.all());
    }

    #[test]
    fn toggle_all_sets_every_flag() {
        let mut filter = StopFilter::default();
        filter.toggle_all();
        assert_eq!(filter, StopFilter::all_enabled());

        filter.toggle_all();
        assert_eq!(filter, StopFilter::new(false, false, false, false));
    }

    #[test]
    fn more_than_three_stops_never_admitted() {
        let filter = StopFilter::all_enabled();
        assert!(filter.admits(3));
        assert!(!filter.admits(4));
        assert!(!filter.admits(10));
    }

    #[test]
    fn parse_flag_names() {
        assert_eq!("direct".parse::<StopFlag>().unwrap(), StopFlag::Direct);
        assert_eq!("oneStop".parse::<StopFlag>().unwrap(), StopFlag::OneStop);
        assert_eq!("two_stops".parse::<StopFlag>().unwrap(), StopFlag::TwoStops);
        assert_eq!(
            "threeStops".parse::<StopFlag>().unwrap(),
            StopFlag::ThreeStops
        );
        assert!("all".parse::<StopFlag>().is_err());
        assert!("fourStops".parse::<StopFlag>().is_err());

        for flag in StopFlag::ALL {
            assert_eq!(flag.as_str().parse::<StopFlag>().unwrap(), flag);
        }
    }
}
