//! Mock Navitia client for running without an API token.
//!
//! Loads canned planning responses from JSON files and serves them as if
//! they were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::domain::Journey;
use crate::worker::{JourneyQueryResult, JourneySource};

use super::convert::convert_planning_response;
use super::error::FetchError;
use super::types::PlanningResponse;

/// One fixture file: the answer for a single origin/destination pair.
#[derive(Debug, Deserialize)]
struct Fixture {
    from: String,
    to: String,
    response: PlanningResponse,
}

/// Mock client that serves planning responses from fixture files.
#[derive(Debug, Clone)]
pub struct MockNavitiaClient {
    /// Pre-loaded responses, keyed by (from, to).
    responses: Arc<HashMap<(String, String), PlanningResponse>>,
}

impl MockNavitiaClient {
    /// Load every `*.json` fixture in a directory.
    ///
    /// Each file holds `{"from": ..., "to": ..., "response": {"journeys": [...]}}`.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data_dir = data_dir.as_ref();
        let mut responses = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| ConfigError::Fixture {
            message: format!("failed to read mock data directory {data_dir:?}: {e}"),
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| ConfigError::Fixture {
                    message: format!("failed to read directory entry: {e}"),
                })?
                .path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path).map_err(|e| ConfigError::Fixture {
                message: format!("failed to read {path:?}: {e}"),
            })?;

            let fixture: Fixture = serde_json::from_str(&json).map_err(|e| ConfigError::Fixture {
                message: format!("failed to parse {path:?}: {e}"),
            })?;

            responses.insert((fixture.from, fixture.to), fixture.response);
        }

        if responses.is_empty() {
            return Err(ConfigError::Fixture {
                message: format!("no fixture files found in {data_dir:?}"),
            });
        }

        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Number of origin/destination pairs with canned data.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// True if no fixtures are loaded.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Look up journeys for a pair.
    ///
    /// Mimics `NavitiaClient::fetch`; the date is ignored since fixtures are
    /// static. Pairs without a fixture answer like a 404 from the API.
    pub fn fetch(&self, origin: &str, destination: &str) -> Result<Vec<Journey>, FetchError> {
        let key = (origin.to_string(), destination.to_string());
        let response = self.responses.get(&key).ok_or_else(|| FetchError::Http {
            status: 404,
            body: format!("no mock data for {origin} → {destination}"),
        })?;

        convert_planning_response(response).map_err(|e| FetchError::Parse {
            message: e.to_string(),
        })
    }
}

impl JourneySource for MockNavitiaClient {
    fn journeys<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
        _date: Option<NaiveDateTime>,
    ) -> BoxFuture<'a, JourneyQueryResult> {
        let result = self.fetch(origin, destination);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FIXTURE: &str = r#"{
        "from": "admin:fr:35184",
        "to": "admin:fr:35238",
        "response": {
            "journeys": [
                {
                    "duration": 4500,
                    "departure_date_time": "20240315T080000",
                    "arrival_date_time": "20240315T091500"
                }
            ]
        }
    }"#;

    #[test]
    fn load_fixtures() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("montauban-rennes.json"), FIXTURE).unwrap();
        std::fs::write(dir.path().join("README.txt"), "not a fixture").unwrap();

        let client = MockNavitiaClient::from_dir(dir.path()).unwrap();
        assert_eq!(client.len(), 1);

        let journeys = client.fetch("admin:fr:35184", "admin:fr:35238").unwrap();
        assert_eq!(journeys.len(), 1);
        assert_eq!(journeys[0].departure_hhmm(), "08:00");
    }

    #[test]
    fn unknown_pair_is_http_404() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), FIXTURE).unwrap();

        let client = MockNavitiaClient::from_dir(dir.path()).unwrap();
        let err = client.fetch("admin:fr:35238", "admin:fr:35184").unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 404, .. }));
    }

    #[test]
    fn empty_directory_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            MockNavitiaClient::from_dir(dir.path()),
            Err(ConfigError::Fixture { .. })
        ));
    }

    #[test]
    fn malformed_fixture_rejected() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{"from": "a"}"#).unwrap();
        assert!(MockNavitiaClient::from_dir(dir.path()).is_err());
    }

    #[tokio::test]
    async fn serves_through_journey_source() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), FIXTURE).unwrap();

        let client = MockNavitiaClient::from_dir(dir.path()).unwrap();
        let journeys = client
            .journeys("admin:fr:35184", "admin:fr:35238", None)
            .await
            .unwrap();
        assert_eq!(journeys[0].arrival_hhmm(), "09:15");
    }
}
