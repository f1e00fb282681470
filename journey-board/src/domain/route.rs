//! Route pairs and the catalog the user cycles through.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// An origin/destination pair the user can select.
///
/// Identifiers are opaque to this crate and passed verbatim to the
/// journey API (e.g. `admin:fr:35238`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutePair {
    /// Origin identifier
    pub origin_id: String,
    /// Origin display name
    pub origin_name: String,
    /// Destination identifier
    pub destination_id: String,
    /// Destination display name
    pub destination_name: String,
}

impl RoutePair {
    /// Creates a route pair.
    pub fn new(
        origin_id: impl Into<String>,
        origin_name: impl Into<String>,
        destination_id: impl Into<String>,
        destination_name: impl Into<String>,
    ) -> Self {
        Self {
            origin_id: origin_id.into(),
            origin_name: origin_name.into(),
            destination_id: destination_id.into(),
            destination_name: destination_name.into(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.origin_id.trim().is_empty() {
            return Err(DomainError::InvalidRoutePair("origin id must not be empty"));
        }
        if self.destination_id.trim().is_empty() {
            return Err(DomainError::InvalidRoutePair(
                "destination id must not be empty",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin_name, self.destination_name)
    }
}

/// Fixed, ordered list of selectable route pairs.
///
/// Identity of a pair is its position in the catalog. The catalog is
/// never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePairCatalog {
    pairs: Vec<RoutePair>,
}

impl RoutePairCatalog {
    /// Build a catalog from an ordered list of pairs.
    ///
    /// An empty list is rejected with [`DomainError::InvalidIndex`]; callers
    /// treat that as fatal at startup.
    pub fn new(pairs: Vec<RoutePair>) -> Result<Self, DomainError> {
        if pairs.is_empty() {
            return Err(DomainError::InvalidIndex { index: 0, len: 0 });
        }
        for pair in &pairs {
            pair.validate()?;
        }
        Ok(Self { pairs })
    }

    /// The pairs in selection order.
    pub fn pairs(&self) -> &[RoutePair] {
        &self.pairs
    }

    /// Look up a pair by index.
    pub fn get(&self, index: usize) -> Option<&RoutePair> {
        self.pairs.get(index)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The index selected after `index`, wrapping to the start.
    pub fn next(&self, index: usize) -> Result<usize, DomainError> {
        let len = self.pairs.len();
        if len == 0 {
            return Err(DomainError::InvalidIndex { index, len });
        }
        Ok((index + 1) % len)
    }
}

impl Default for RoutePairCatalog {
    /// Montauban and Montfort, both ways to and from Rennes.
    fn default() -> Self {
        Self {
            pairs: vec![
                RoutePair::new("admin:fr:35184", "Montauban", "admin:fr:35238", "Rennes"),
                RoutePair::new("admin:fr:35238", "Rennes", "admin:fr:35184", "Montauban"),
                RoutePair::new("admin:fr:35188", "Montfort", "admin:fr:35238", "Rennes"),
                RoutePair::new("admin:fr:35238", "Rennes", "admin:fr:35188", "Montfort"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(from: &str, to: &str) -> RoutePair {
        RoutePair::new(from, from, to, to)
    }

    #[test]
    fn empty_catalog_rejected() {
        let err = RoutePairCatalog::new(Vec::new()).unwrap_err();
        assert_eq!(err, DomainError::InvalidIndex { index: 0, len: 0 });
    }

    #[test]
    fn blank_identifier_rejected() {
        let result = RoutePairCatalog::new(vec![pair("", "B")]);
        assert!(matches!(result, Err(DomainError::InvalidRoutePair(_))));

        let result = RoutePairCatalog::new(vec![pair("A", "  ")]);
        assert!(matches!(result, Err(DomainError::InvalidRoutePair(_))));
    }

    #[test]
    fn next_wraps_around() {
        let catalog = RoutePairCatalog::new(vec![pair("A", "B"), pair("B", "A"), pair("C", "A")])
            .unwrap();
        assert_eq!(catalog.next(0).unwrap(), 1);
        assert_eq!(catalog.next(1).unwrap(), 2);
        assert_eq!(catalog.next(2).unwrap(), 0);
    }

    #[test]
    fn single_pair_selects_itself() {
        let catalog = RoutePairCatalog::new(vec![pair("A", "B")]).unwrap();
        assert_eq!(catalog.next(0).unwrap(), 0);
    }

    #[test]
    fn pairs_are_stable() {
        let catalog = RoutePairCatalog::default();
        assert_eq!(catalog.pairs(), catalog.pairs());
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(0).unwrap().origin_name, "Montauban");
        assert_eq!(catalog.get(3).unwrap().destination_id, "admin:fr:35188");
        assert!(catalog.get(4).is_none());
    }

    #[test]
    fn display() {
        let pair = RoutePair::new("admin:fr:35184", "Montauban", "admin:fr:35238", "Rennes");
        assert_eq!(pair.to_string(), "Montauban → Rennes");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn catalog_of(len: usize) -> RoutePairCatalog {
        let pairs = (0..len)
            .map(|i| RoutePair::new(format!("o{i}"), "O", format!("d{i}"), "D"))
            .collect();
        RoutePairCatalog::new(pairs).unwrap()
    }

    proptest! {
        /// Advancing `len` times from any start returns to that start
        #[test]
        fn cycle_returns_to_start(len in 1usize..32, start_seed in 0usize..1000) {
            let catalog = catalog_of(len);
            let start = start_seed % len;
            let mut index = start;
            for _ in 0..len {
                index = catalog.next(index).unwrap();
            }
            prop_assert_eq!(index, start);
        }

        /// Next is always a valid index
        #[test]
        fn next_in_bounds(len in 1usize..32, start_seed in 0usize..1000) {
            let catalog = catalog_of(len);
            let next = catalog.next(start_seed % len).unwrap();
            prop_assert!(next < len);
            prop_assert!(catalog.get(next).is_some());
        }
    }
}
