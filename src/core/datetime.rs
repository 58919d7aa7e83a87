//! Wire date/time and duration-unit normalization
//!
//! The interchange format requires fixed-width date-times with an explicit
//! colon-separated timezone offset, date-only strings for plain dates, and
//! UCUM codes for units of time. All instants in this crate are UTC, so the
//! emitted offset is always `+00:00`.

use crate::domain::errors::CaduceusError;
use crate::domain::result::Result;
use chrono::{DateTime, Utc};

/// Formats an instant as an interchange date-time (`2015-06-01T12:30:00+00:00`)
pub fn to_wire_timestamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Formats an instant as an interchange date (`2015-06-01`)
pub fn to_wire_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Maps a unit-of-time name to its UCUM code
///
/// # Errors
///
/// Fatal for any unit outside the supported set; dosage timing with a
/// misspelled unit would otherwise emit an invalid document.
pub fn to_ucum(unit: &str) -> Result<&'static str> {
    match unit {
        "seconds" => Ok("s"),
        "minutes" => Ok("min"),
        "hours" => Ok("h"),
        "days" => Ok("d"),
        "weeks" => Ok("wk"),
        "months" => Ok("mo"),
        "years" => Ok("a"),
        other => Err(CaduceusError::UnrecognizedUnit(other.to_string())),
    }
}
