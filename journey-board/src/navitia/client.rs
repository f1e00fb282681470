//! Navitia HTTP client.
//!
//! Provides the async journey lookup used by the background worker.
//! Handles authentication, the query format, and conversion to domain types.

use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::domain::Journey;
use crate::worker::{JourneyQueryResult, JourneySource};

use super::convert::convert_planning_response;
use super::error::FetchError;
use super::types::PlanningResponse;

/// Default journeys endpoint (SNCF coverage).
const DEFAULT_ENDPOINT: &str = "https://api.sncf.com/v1/coverage/sncf/journeys";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Number of journeys requested per lookup.
pub const JOURNEY_COUNT: u8 = 15;

/// Date-time format for the `datetime` query parameter (ISO-8601 local).
const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Configuration for the Navitia client.
#[derive(Debug, Clone)]
pub struct NavitiaConfig {
    /// Opaque token sent verbatim in the `Authorization` header
    pub token: String,
    /// Journeys endpoint URL (defaults to SNCF production)
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NavitiaConfig {
    /// Create a new config with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom endpoint (for testing).
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Navitia journeys API client.
#[derive(Debug, Clone)]
pub struct NavitiaClient {
    http: reqwest::Client,
    endpoint: String,
}

impl NavitiaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NavitiaConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();

        let token =
            HeaderValue::from_str(&config.token).map_err(|_| ConfigError::InvalidToken)?;
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    /// The endpoint this client queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch journeys between two identifiers.
    ///
    /// # Arguments
    ///
    /// * `origin` - Origin identifier (e.g. `admin:fr:35238`)
    /// * `destination` - Destination identifier
    /// * `date` - Optional local departure date-time; the API defaults to now
    ///
    /// There is no retry here: a failed lookup is returned to the caller.
    pub async fn fetch(
        &self,
        origin: &str,
        destination: &str,
        date: Option<NaiveDateTime>,
    ) -> Result<Vec<Journey>, FetchError> {
        let query = journey_query(origin, destination, date);
        debug!(origin, destination, ?date, "requesting journeys");

        let response = self.http.get(&self.endpoint).query(&query).send().await?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "journey request rejected");
            return Err(FetchError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        let planning: PlanningResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse {
                message: e.to_string(),
            })?;

        let journeys = convert_planning_response(&planning).map_err(|e| FetchError::Parse {
            message: e.to_string(),
        })?;

        debug!(origin, destination, count = journeys.len(), "journeys received");
        Ok(journeys)
    }
}

impl JourneySource for NavitiaClient {
    fn journeys<'a>(
        &'a self,
        origin: &'a str,
        destination: &'a str,
        date: Option<NaiveDateTime>,
    ) -> BoxFuture<'a, JourneyQueryResult> {
        Box::pin(self.fetch(origin, destination, date))
    }
}

/// Build the query parameters for a journey lookup.
fn journey_query(
    origin: &str,
    destination: &str,
    date: Option<NaiveDateTime>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("count", JOURNEY_COUNT.to_string()),
        ("from", origin.to_string()),
        ("to", destination.to_string()),
    ];
    if let Some(date) = date {
        query.push(("datetime", date.format(QUERY_DATETIME_FORMAT).to_string()));
    }
    query
}
