//! Entity keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locates an entity: a kind (the backend "table" name) plus an `i64`
/// surrogate id.
///
/// A key is *complete* when the id is present. Keys start out incomplete
/// for objects that have never been persisted; the backend assigns the id
/// at `put` and returns the completed key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    kind: String,
    id: Option<i64>,
}

impl Key {
    /// Creates a complete key.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id),
        }
    }

    /// Creates an incomplete key requesting backend id assignment.
    #[must_use]
    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
        }
    }

    /// Returns the kind this key belongs to.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the id, if assigned.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Returns `true` if the id has been assigned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.id.is_some()
    }

    /// Returns a copy of this key completed with the given id.
    #[must_use]
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            kind: self.kind.clone(),
            id: Some(id),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}({})", self.kind, id),
            None => write!(f, "{}(incomplete)", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_key() {
        let key = Key::new("Book", 7);
        assert_eq!(key.kind(), "Book");
        assert_eq!(key.id(), Some(7));
        assert!(key.is_complete());
    }

    #[test]
    fn incomplete_key() {
        let key = Key::incomplete("Book");
        assert_eq!(key.id(), None);
        assert!(!key.is_complete());
    }

    #[test]
    fn with_id_completes() {
        let key = Key::incomplete("Book").with_id(42);
        assert_eq!(key, Key::new("Book", 42));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Key::new("Book", 7)), "Book(7)");
        assert_eq!(format!("{}", Key::incomplete("Book")), "Book(incomplete)");
    }
}
