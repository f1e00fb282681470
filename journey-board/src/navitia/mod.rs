//! Navitia journey-planning client.
//!
//! This module provides an HTTP client for the Navitia `journeys` endpoint
//! (as deployed by SNCF), which answers "what trips go from A to B".
//!
//! Key characteristics of the API:
//! - Fields use snake_case naming
//! - Timestamps are compact local date-times (`YYYYMMDDTHHMMSS`)
//! - Authentication is a raw token in the `Authorization` header
//! - Non-200 responses carry a free-form error body

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{JOURNEY_COUNT, NavitiaClient, NavitiaConfig};
pub use convert::{ConversionError, convert_planning_response, parse_navitia_datetime};
pub use error::{ErrorKind, FetchError};
pub use mock::MockNavitiaClient;
pub use types::{JourneyDto, PlanningResponse};
