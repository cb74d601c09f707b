//! Temporal ↔ timestamp conversion.
//!
//! Every temporal domain value stores as a single UTC timestamp:
//!
//! - dates store as midnight UTC on that date
//! - date-times store with the same naive value read as UTC
//! - times store on the Unix epoch date
//!
//! Conversion is through UTC with no configured zone; zone policy belongs
//! to the application layer, and UTC keeps date-only values exact across
//! a round trip.

use crate::value::TemporalValue;
use chrono::{DateTime, NaiveTime, Utc};

/// Converts a temporal domain value to its stored timestamp.
#[must_use]
pub fn to_timestamp(value: &TemporalValue) -> DateTime<Utc> {
    match value {
        TemporalValue::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        TemporalValue::DateTime(dt) => dt.and_utc(),
        TemporalValue::Time(t) => DateTime::UNIX_EPOCH.date_naive().and_time(*t).and_utc(),
    }
}

/// Converts a stored timestamp back to a temporal domain value.
///
/// The result is always the full date-and-time form; field setters
/// project the declared component out of it (see
/// [`crate::DomainValue::into_date`] and friends).
#[must_use]
pub fn from_timestamp(ts: DateTime<Utc>) -> TemporalValue {
    TemporalValue::DateTime(ts.naive_utc())
}
