//! Conversion from Navitia DTOs to domain types.

use chrono::{Duration, NaiveDateTime};

use crate::domain::Journey;

use super::types::{JourneyDto, PlanningResponse};

/// Navitia's compact local date-time format.
const NAVITIA_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid {field} '{value}': expected YYYYMMDDTHHMMSS")]
    InvalidDateTime { field: &'static str, value: String },
}

/// Parse a compact Navitia date-time such as `20240315T080000`.
pub fn parse_navitia_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, NAVITIA_DATETIME_FORMAT).ok()
}

/// Convert a planning response to journeys, preserving API order.
///
/// A single bad timestamp fails the whole response.
pub fn convert_planning_response(
    response: &PlanningResponse,
) -> Result<Vec<Journey>, ConversionError> {
    response.journeys.iter().map(convert_journey).collect()
}

fn convert_journey(dto: &JourneyDto) -> Result<Journey, ConversionError> {
    let departure = parse_field("departure_date_time", &dto.departure_date_time)?;
    let arrival = parse_field("arrival_date_time", &dto.arrival_date_time)?;

    Ok(Journey {
        departure,
        arrival,
        duration: Duration::seconds(dto.duration),
        transfers: dto.nb_transfers,
        kind: dto.journey_type.clone(),
    })
}

fn parse_field(field: &'static str, value: &str) -> Result<NaiveDateTime, ConversionError> {
    parse_navitia_datetime(value).ok_or_else(|| ConversionError::InvalidDateTime {
        field,
        value: value.to_string(),
    })
}
