//! # Temporal Values: JSON-FG `time` Members
//!
//! Parses the members of a JSON-FG `time` object into typed values:
//!
//! - `date`: an RFC 3339 full-date (`YYYY-MM-DD`);
//! - `timestamp`: an RFC 3339 date-time (`YYYY-MM-DDTHH:MM:SS[.f](Z|±HH:MM)`);
//! - `interval`: a two-member array whose bounds are a full-date, a
//!   date-time, or the literal `".."` for an unbounded end.
//!
//! ## Comparison Semantics
//!
//! Two timestamps compare as instants on the UTC time line. As soon as one
//! side of a comparison is a full-date, both sides are compared at day
//! granularity using the full-date written in the value (a timestamp's
//! date is taken in its own offset, which is what appears in the text).
//!
//! The full-date check is strict: chrono alone accepts single-digit months
//! and days, which RFC 3339 does not.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::Value;

use crate::error::TemporalError;
use crate::json_kind;

/// Literal marking an unbounded interval end.
pub const UNBOUNDED: &str = "..";

/// A point in time as written in a JSON-FG document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalInstant {
    /// A full-date.
    Date(NaiveDate),
    /// A date-time with its original offset.
    Timestamp(DateTime<FixedOffset>),
}

impl TemporalInstant {
    /// Parse a full-date member value.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotAString`] or [`TemporalError::InvalidDate`].
    pub fn date_from_value(value: &Value) -> Result<Self, TemporalError> {
        Self::parse_date(as_str(value)?)
    }

    /// Parse a date-time member value.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotAString`] or [`TemporalError::InvalidTimestamp`].
    pub fn timestamp_from_value(value: &Value) -> Result<Self, TemporalError> {
        Self::parse_timestamp(as_str(value)?)
    }

    /// Parse an RFC 3339 full-date.
    pub fn parse_date(s: &str) -> Result<Self, TemporalError> {
        if !has_full_date_shape(s) {
            return Err(TemporalError::InvalidDate {
                value: s.to_string(),
                reason: "expected YYYY-MM-DD".to_string(),
            });
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|e| TemporalError::InvalidDate {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Parse an RFC 3339 date-time, keeping its offset.
    pub fn parse_timestamp(s: &str) -> Result<Self, TemporalError> {
        DateTime::parse_from_rfc3339(s)
            .map(Self::Timestamp)
            .map_err(|e| TemporalError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Parse either form, deciding by shape: ten characters is a full-date,
    /// anything longer must be a date-time.
    pub fn parse(s: &str) -> Result<Self, TemporalError> {
        if s.len() <= 10 {
            Self::parse_date(s)
        } else {
            Self::parse_timestamp(s)
        }
    }

    /// The full-date part as written in the document.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::Timestamp(ts) => ts.date_naive(),
        }
    }

    /// True for timestamps carrying a zero UTC offset (`Z`, `+00:00`).
    ///
    /// Full-dates carry no offset and are never reported as non-UTC.
    pub fn is_utc(&self) -> bool {
        match self {
            Self::Date(_) => true,
            Self::Timestamp(ts) => ts.offset().local_minus_utc() == 0,
        }
    }

    /// Whether this value is a date-time rather than a full-date.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Self::Timestamp(_))
    }

    /// Compare two instants per the module-level semantics.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.date().cmp(&other.date()),
        }
    }
}

impl std::fmt::Display for TemporalInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
        }
    }
}

/// One end of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalBound {
    /// `".."`: open towards the past (start) or the future (end).
    Unbounded,
    /// A concrete date or date-time.
    At(TemporalInstant),
}

impl IntervalBound {
    /// Parse one interval member.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotAString`] or [`TemporalError::InvalidBound`].
    pub fn from_value(value: &Value) -> Result<Self, TemporalError> {
        let s = as_str(value)?;
        if s == UNBOUNDED {
            return Ok(Self::Unbounded);
        }
        TemporalInstant::parse(s)
            .map(Self::At)
            .map_err(|_| TemporalError::InvalidBound(s.to_string()))
    }

    /// The concrete instant, if bounded.
    pub fn instant(&self) -> Option<&TemporalInstant> {
        match self {
            Self::Unbounded => None,
            Self::At(instant) => Some(instant),
        }
    }
}

/// A closed interval with optionally unbounded ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Start bound.
    pub start: IntervalBound,
    /// End bound.
    pub end: IntervalBound,
}

impl Interval {
    /// Parse the `interval` member.
    ///
    /// # Errors
    ///
    /// Returns the first structural or bound error encountered.
    pub fn from_value(value: &Value) -> Result<Self, TemporalError> {
        let items = value
            .as_array()
            .ok_or(TemporalError::IntervalNotArray { found: json_kind(value) })?;
        if items.len() != 2 {
            return Err(TemporalError::IntervalArity(items.len()));
        }
        Ok(Self {
            start: IntervalBound::from_value(&items[0])?,
            end: IntervalBound::from_value(&items[1])?,
        })
    }

    /// True unless both ends are bounded and the start lies after the end.
    pub fn is_ordered(&self) -> bool {
        match (self.start.instant(), self.end.instant()) {
            (Some(start), Some(end)) => start.compare(end) != Ordering::Greater,
            _ => true,
        }
    }

    /// Whether `instant` lies inside the interval, ends included.
    pub fn contains(&self, instant: &TemporalInstant) -> bool {
        let after_start = self
            .start
            .instant()
            .map_or(true, |start| instant.compare(start) != Ordering::Less);
        let before_end = self
            .end
            .instant()
            .map_or(true, |end| instant.compare(end) != Ordering::Greater);
        after_start && before_end
    }
}

fn as_str(value: &Value) -> Result<&str, TemporalError> {
    value
        .as_str()
        .ok_or(TemporalError::NotAString { found: json_kind(value) })
}

fn has_full_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
