//! Domain error types.
//!
//! These errors represent configuration and validation failures in the
//! domain layer. They are distinct from API/IO errors, which are carried
//! as values through the delivery path.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Route index cannot be resolved against the catalog.
    ///
    /// An empty catalog is a configuration error and is reported with
    /// `len == 0` at startup.
    #[error("invalid route index {index} for a catalog of {len} route pairs")]
    InvalidIndex { index: usize, len: usize },

    /// A route pair is missing an identifier
    #[error("invalid route pair: {0}")]
    InvalidRoutePair(&'static str),
}
