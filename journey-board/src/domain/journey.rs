//! Journey types.
//!
//! A `Journey` is one scheduled trip returned by the planning API for a
//! route pair. The client does not plan anything itself; it only carries
//! what the API answered.

use chrono::{Duration, NaiveDateTime};

/// A scheduled trip between the two ends of a route pair.
///
/// Times are local to the API's coverage area. `departure <= arrival` is
/// expected but not checked: entries are passed through as the API sent
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    /// Departure from the origin
    pub departure: NaiveDateTime,
    /// Arrival at the destination
    pub arrival: NaiveDateTime,
    /// Duration as reported by the API
    pub duration: Duration,
    /// Number of changes, when reported
    pub transfers: Option<u32>,
    /// API classification (e.g. "best", "fastest"), when reported
    pub kind: Option<String>,
}

impl Journey {
    /// Creates a journey with the given times, deriving the duration.
    pub fn new(departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        Self {
            departure,
            arrival,
            duration: arrival - departure,
            transfers: None,
            kind: None,
        }
    }

    /// Returns true if the journey has no changes.
    ///
    /// Unknown transfer counts are not treated as direct.
    pub fn is_direct(&self) -> bool {
        self.transfers == Some(0)
    }

    /// Departure time formatted for display ("HH:MM").
    pub fn departure_hhmm(&self) -> String {
        self.departure.format("%H:%M").to_string()
    }

    /// Arrival time formatted for display ("HH:MM").
    pub fn arrival_hhmm(&self) -> String {
        self.arrival.format("%H:%M").to_string()
    }
}
