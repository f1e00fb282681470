//! Domain types for the journey board.
//!
//! Route pairs the user cycles through and the journeys returned for them.
//! Types enforce their invariants at construction time.

mod error;
mod journey;
mod route;

pub use error::DomainError;
pub use journey::Journey;
pub use route::{RoutePair, RoutePairCatalog};
