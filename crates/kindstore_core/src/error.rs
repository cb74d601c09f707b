//! Error types for the mapping engine.

use kindstore_storage::StorageError;
use thiserror::Error;

/// Result type for mapping and repository operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while mapping objects or driving the store.
///
/// Absent data is deliberately not part of this taxonomy: a missing key is
/// `Ok(None)` on reads, and a dangling relation resolves to
/// `Relation::Absent`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Field access or instantiation failed during object↔entity
    /// translation. Fatal to the single mapping call; the target object
    /// is discarded, never partially applied.
    #[error("mapping error on {kind}.{field}: {message}")]
    Mapping {
        /// Kind of the type being mapped.
        kind: String,
        /// Domain field that failed.
        field: String,
        /// Description of the failure.
        message: String,
    },

    /// A declared converter rejected a value, in either direction.
    #[error("conversion error on field {field}: cannot convert {value:?} to {target}: {message}")]
    Conversion {
        /// Domain field the converter was declared on.
        field: String,
        /// The representation that was being converted.
        value: String,
        /// The representation that was being produced.
        target: String,
        /// Description of the failure.
        message: String,
    },

    /// `begin` was called while a transaction is already open.
    #[error("a transaction is already open")]
    TransactionOpen,

    /// The backend failed. Propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CoreError {
    /// Creates a mapping error with empty field context.
    ///
    /// The mapper fills in kind and field via [`CoreError::in_field`]
    /// before the error leaves the mapping call.
    pub fn mapping(message: impl Into<String>) -> Self {
        Self::Mapping {
            kind: String::new(),
            field: String::new(),
            message: message.into(),
        }
    }

    /// Creates a mapping error for a known kind and field.
    pub fn mapping_in(
        kind: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mapping {
            kind: kind.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a conversion error carrying both representations attempted.
    pub fn conversion(
        value: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            field: String::new(),
            value: value.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Fills empty kind/field context on `Mapping` and `Conversion`
    /// errors; other variants pass through untouched.
    #[must_use]
    pub(crate) fn in_field(self, kind: &str, field: &str) -> Self {
        match self {
            Self::Mapping {
                kind: k,
                field: f,
                message,
            } => Self::Mapping {
                kind: if k.is_empty() { kind.into() } else { k },
                field: if f.is_empty() { field.into() } else { f },
                message,
            },
            Self::Conversion {
                field: f,
                value,
                target,
                message,
            } => Self::Conversion {
                field: if f.is_empty() { field.into() } else { f },
                value,
                target,
                message,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_field_fills_empty_context() {
        let err = CoreError::mapping("expected text").in_field("Person", "name");
        assert_eq!(
            err.to_string(),
            "mapping error on Person.name: expected text"
        );
    }

    #[test]
    fn in_field_keeps_existing_context() {
        let err = CoreError::mapping_in("Other", "field", "boom").in_field("Person", "name");
        assert_eq!(err.to_string(), "mapping error on Other.field: boom");
    }

    #[test]
    fn conversion_error_carries_both_representations() {
        let err =
            CoreError::conversion("abc", "float", "invalid digit").in_field("Person", "score");
        let text = err.to_string();
        assert!(text.contains("score"));
        assert!(text.contains("abc"));
        assert!(text.contains("float"));
    }
}
