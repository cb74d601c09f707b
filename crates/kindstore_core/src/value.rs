//! Domain-side values exchanged between schemas and the mapper.

use crate::error::{CoreError, CoreResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Marks a large text value on a domain type.
///
/// Long text is stored through the backend's unindexable long-text
/// representation and comes back as `LongText`, never as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongText(pub String);

impl LongText {
    /// Returns the text content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for LongText {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LongText {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for LongText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A temporal domain value: date-only, date-and-time, or time-only.
///
/// All three variants store as a single backend timestamp; the declared
/// field shape decides which component comes back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    /// A calendar date with no time-of-day component.
    Date(NaiveDate),
    /// A date and time.
    DateTime(NaiveDateTime),
    /// A time-of-day with no date component.
    Time(NaiveTime),
}

/// A field value in its domain representation.
///
/// Schema accessors hand these to the mapper on write and receive them
/// back on read; the mapper owns the translation to and from the
/// backend's storable [`kindstore_storage::Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    /// Absent value.
    Null,
    /// Short text.
    Text(String),
    /// Large text, stored unindexed.
    LongText(LongText),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Temporal value.
    Temporal(TemporalValue),
}

impl DomainValue {
    /// Maps `Null` to `None` and any other value to `Some`.
    ///
    /// The escape hatch for optional fields:
    /// `value.opt().map(DomainValue::into_text).transpose()?`.
    #[must_use]
    pub fn opt(self) -> Option<Self> {
        match self {
            Self::Null => None,
            other => Some(other),
        }
    }

    /// Extracts text content.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for any other variant.
    pub fn into_text(self) -> CoreResult<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }

    /// Extracts long text content.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for any other variant.
    pub fn into_long_text(self) -> CoreResult<LongText> {
        match self {
            Self::LongText(t) => Ok(t),
            other => Err(mismatch("long text", &other)),
        }
    }

    /// Extracts an integer.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for any other variant.
    pub fn into_i64(self) -> CoreResult<i64> {
        match self {
            Self::Integer(n) => Ok(n),
            other => Err(mismatch("integer", &other)),
        }
    }

    /// Extracts a float.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for any other variant.
    pub fn into_f64(self) -> CoreResult<f64> {
        match self {
            Self::Float(n) => Ok(n),
            other => Err(mismatch("float", &other)),
        }
    }

    /// Extracts a boolean.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for any other variant.
    pub fn into_bool(self) -> CoreResult<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }

    /// Extracts a date, projecting the date component of a full
    /// date-and-time temporal.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for non-temporal variants and time-only
    /// temporals.
    pub fn into_date(self) -> CoreResult<NaiveDate> {
        match self {
            Self::Temporal(TemporalValue::Date(d)) => Ok(d),
            Self::Temporal(TemporalValue::DateTime(dt)) => Ok(dt.date()),
            other => Err(mismatch("date", &other)),
        }
    }

    /// Extracts a date-and-time, widening a date-only temporal to
    /// midnight.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for non-temporal variants and time-only
    /// temporals.
    pub fn into_datetime(self) -> CoreResult<NaiveDateTime> {
        match self {
            Self::Temporal(TemporalValue::DateTime(dt)) => Ok(dt),
            Self::Temporal(TemporalValue::Date(d)) => Ok(d.and_time(NaiveTime::MIN)),
            other => Err(mismatch("datetime", &other)),
        }
    }

    /// Extracts a time-of-day, projecting the time component of a full
    /// date-and-time temporal.
    ///
    /// # Errors
    ///
    /// Returns a mapping error for non-temporal variants and date-only
    /// temporals.
    pub fn into_time(self) -> CoreResult<NaiveTime> {
        match self {
            Self::Temporal(TemporalValue::Time(t)) => Ok(t),
            Self::Temporal(TemporalValue::DateTime(dt)) => Ok(dt.time()),
            other => Err(mismatch("time", &other)),
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::LongText(_) => "long text",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Temporal(TemporalValue::Date(_)) => "date",
            Self::Temporal(TemporalValue::DateTime(_)) => "datetime",
            Self::Temporal(TemporalValue::Time(_)) => "time",
        }
    }
}

fn mismatch(expected: &str, got: &DomainValue) -> CoreError {
    CoreError::mapping(format!("expected {expected}, got {}", got.variant_name()))
}

impl From<String> for DomainValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for DomainValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<LongText> for DomainValue {
    fn from(t: LongText) -> Self {
        Self::LongText(t)
    }
}

impl From<i64> for DomainValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for DomainValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for DomainValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for DomainValue {
    fn from(d: NaiveDate) -> Self {
        Self::Temporal(TemporalValue::Date(d))
    }
}

impl From<NaiveDateTime> for DomainValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Temporal(TemporalValue::DateTime(dt))
    }
}

impl From<NaiveTime> for DomainValue {
    fn from(t: NaiveTime) -> Self {
        Self::Temporal(TemporalValue::Time(t))
    }
}

impl<V: Into<DomainValue>> From<Option<V>> for DomainValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
