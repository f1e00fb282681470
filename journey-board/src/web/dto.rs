//! Data transfer objects for web responses.

use serde::Serialize;

use crate::board::BoardStatus;
use crate::domain::{Journey, RoutePair};
use crate::navitia::FetchError;

use super::view::{BoardView, ViewPhase};

/// Date-time format used in responses.
const RESPONSE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A route pair.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    /// Position in the catalog
    pub index: usize,

    /// Origin identifier
    pub origin_id: String,

    /// Origin display name
    pub origin_name: String,

    /// Destination identifier
    pub destination_id: String,

    /// Destination display name
    pub destination_name: String,
}

/// Response listing the route catalog.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    /// Routes in selection order
    pub routes: Vec<RouteResult>,

    /// Index of the selected route
    pub selected: usize,
}

/// A journey option.
#[derive(Debug, Serialize)]
pub struct JourneyResult {
    /// Departure (local date-time)
    pub departure: String,

    /// Arrival (local date-time)
    pub arrival: String,

    /// Departure time (HH:MM)
    pub departure_time: String,

    /// Arrival time (HH:MM)
    pub arrival_time: String,

    /// Duration in minutes
    pub duration_mins: i64,

    /// Number of changes, if known
    pub transfers: Option<u32>,

    /// API classification
    pub kind: Option<String>,
}

/// A failed lookup.
#[derive(Debug, Serialize)]
pub struct LookupError {
    /// Error kind (`transport_error`, `http_error`, `parse_error`)
    pub kind: &'static str,

    /// Detail message
    pub detail: String,
}

/// Response for the rendered journey list.
#[derive(Debug, Serialize)]
pub struct JourneysResponse {
    /// Route the list belongs to
    pub route: Option<RoutePairResult>,

    /// `idle`, `loading`, `ready`, or `error`
    pub status: &'static str,

    /// Journeys (empty unless `ready`)
    pub journeys: Vec<JourneyResult>,

    /// Failure detail (only when `error`)
    pub error: Option<LookupError>,

    /// When the list last changed
    pub updated_at: Option<String>,
}

/// A route pair without catalog position.
#[derive(Debug, Serialize)]
pub struct RoutePairResult {
    pub origin_id: String,
    pub origin_name: String,
    pub destination_id: String,
    pub destination_name: String,
}

/// Response describing the session and selection.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Connection state
    pub connection: &'static str,

    /// Selected route
    pub route: RouteResult,

    /// Route whose result was last shown
    pub last_delivered_index: Option<usize>,

    /// Fetches issued since start
    pub fetches_issued: u64,

    /// Results dropped because the selection had moved on
    pub stale_discards: u64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl RouteResult {
    /// Create from a catalog entry.
    pub fn from_pair(index: usize, pair: &RoutePair) -> Self {
        Self {
            index,
            origin_id: pair.origin_id.clone(),
            origin_name: pair.origin_name.clone(),
            destination_id: pair.destination_id.clone(),
            destination_name: pair.destination_name.clone(),
        }
    }
}

impl From<&RoutePair> for RoutePairResult {
    fn from(pair: &RoutePair) -> Self {
        Self {
            origin_id: pair.origin_id.clone(),
            origin_name: pair.origin_name.clone(),
            destination_id: pair.destination_id.clone(),
            destination_name: pair.destination_name.clone(),
        }
    }
}

impl From<&Journey> for JourneyResult {
    fn from(journey: &Journey) -> Self {
        Self {
            departure: journey.departure.format(RESPONSE_DATETIME_FORMAT).to_string(),
            arrival: journey.arrival.format(RESPONSE_DATETIME_FORMAT).to_string(),
            departure_time: journey.departure_hhmm(),
            arrival_time: journey.arrival_hhmm(),
            duration_mins: journey.duration.num_minutes(),
            transfers: journey.transfers,
            kind: journey.kind.clone(),
        }
    }
}

impl From<&FetchError> for LookupError {
    fn from(err: &FetchError) -> Self {
        Self {
            kind: err.kind().as_str(),
            detail: err.detail(),
        }
    }
}

impl From<&BoardView> for JourneysResponse {
    fn from(view: &BoardView) -> Self {
        let (status, journeys, error): (_, Vec<JourneyResult>, Option<LookupError>) =
            match &view.phase {
                ViewPhase::Idle => ("idle", Vec::new(), None),
                ViewPhase::Loading => ("loading", Vec::new(), None),
                ViewPhase::Ready(journeys) => {
                    ("ready", journeys.iter().map(JourneyResult::from).collect(), None)
                }
                ViewPhase::Failed(e) => ("error", Vec::new(), Some(LookupError::from(e))),
            };

        Self {
            route: view.route.as_ref().map(Into::into),
            status,
            journeys,
            error,
            updated_at: view.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<&BoardStatus> for SessionResponse {
    fn from(status: &BoardStatus) -> Self {
        Self {
            connection: status.connection.as_str(),
            route: RouteResult::from_pair(status.selection.current_index, &status.current_pair),
            last_delivered_index: status.selection.last_delivered_index,
            fetches_issued: status.selection.fetches_issued,
            stale_discards: status.selection.stale_discards,
        }
    }
}
