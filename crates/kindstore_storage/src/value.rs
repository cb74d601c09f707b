//! Storable property values.

use crate::key::Key;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A primitive value as stored by a backend.
///
/// This is the closed set of representations a property can take on disk:
/// text, numbers, booleans, timestamps, references to other entities, and
/// a distinct long-text variant for values too large to index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent / null value.
    Null,
    /// Short, indexable text.
    Text(String),
    /// Large text. Never indexed; distinguishable from `Text` on read.
    LongText(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Point in time, stored in UTC.
    Timestamp(DateTime<Utc>),
    /// Reference to another entity. Always a complete key.
    Key(Key),
}

impl Value {
    /// Returns the text content for `Text`, `None` otherwise.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content for `Integer`, `None` otherwise.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float content for `Float`, `None` otherwise.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean content for `Bool`, `None` otherwise.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp content for `Timestamp`, `None` otherwise.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the referenced key for `Key`, `None` otherwise.
    #[must_use]
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            Self::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Total ordering used for query sorting.
    ///
    /// Values of the same variant compare naturally; values of different
    /// variants compare by a fixed variant rank so mixed-type properties
    /// still sort deterministically.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::LongText(a), Self::LongText(b)) => a.cmp(b),
            (Self::Key(a), Self::Key(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) => 2,
            Self::Float(_) => 3,
            Self::Timestamp(_) => 4,
            Self::Text(_) => 5,
            Self::LongText(_) => 6,
            Self::Key(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accessors() {
        assert_eq!(Value::Text("a".into()).as_text(), Some("a"));
        assert_eq!(Value::Integer(4).as_i64(), Some(4));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Integer(4).as_text(), None);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn same_variant_ordering() {
        assert_eq!(
            Value::Integer(1).sort_cmp(&Value::Integer(2)),
            Ordering::Less
        );
        assert_eq!(
            Value::Text("b".into()).sort_cmp(&Value::Text("a".into())),
            Ordering::Greater
        );
        let t1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            Value::Timestamp(t1).sort_cmp(&Value::Timestamp(t2)),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_variant_ordering_is_by_rank() {
        assert_eq!(Value::Null.sort_cmp(&Value::Integer(0)), Ordering::Less);
        assert_eq!(
            Value::Text("a".into()).sort_cmp(&Value::Integer(9)),
            Ordering::Greater
        );
    }

    #[test]
    fn float_total_order_handles_nan() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.sort_cmp(&nan), Ordering::Equal);
    }
}
