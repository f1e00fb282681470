//! Navitia API response DTOs.
//!
//! These types map directly to the `journeys` JSON response. Only the
//! fields the board needs are declared; everything else is ignored.

use serde::{Deserialize, Serialize};

/// Response from the `journeys` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanningResponse {
    /// Proposed journeys, ranked by the API.
    pub journeys: Vec<JourneyDto>,
}

/// One proposed journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct JourneyDto {
    /// Total duration in seconds.
    pub duration: i64,

    /// Departure, compact local date-time (e.g. "20240315T080000").
    pub departure_date_time: String,

    /// Arrival, compact local date-time.
    pub arrival_date_time: String,

    /// Number of changes.
    #[serde(default)]
    pub nb_transfers: Option<u32>,

    /// Journey classification ("best", "fastest", "comfort", ...).
    #[serde(default, rename = "type")]
    pub journey_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_journey() {
        let json = r#"{
            "duration": 4500,
            "departure_date_time": "20240315T080000",
            "arrival_date_time": "20240315T091500"
        }"#;
        let dto: JourneyDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.duration, 4500);
        assert_eq!(dto.nb_transfers, None);
        assert_eq!(dto.journey_type, None);
    }

    #[test]
    fn unknown_fields_ignored() {
        let json = r#"{
            "journeys": [{
                "duration": 60,
                "departure_date_time": "20240315T080000",
                "arrival_date_time": "20240315T080100",
                "nb_transfers": 1,
                "type": "fastest",
                "sections": [],
                "status": ""
            }],
            "links": [],
            "context": {"timezone": "Europe/Paris"}
        }"#;
        let response: PlanningResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.journeys.len(), 1);
        assert_eq!(response.journeys[0].nb_transfers, Some(1));
        assert_eq!(response.journeys[0].journey_type.as_deref(), Some("fastest"));
    }

    #[test]
    fn missing_journeys_rejected() {
        let result: Result<PlanningResponse, _> = serde_json::from_str(r#"{"links": []}"#);
        assert!(result.is_err());
    }
}
