//! # Error Hierarchy
//!
//! Structured error types shared by the validator crates, built with
//! `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! These errors describe why a *value inside a document* could not be
//! interpreted. They are turned into conformance findings by the test
//! suite; they never abort a validation run on their own.

use thiserror::Error;

/// Errors interpreting the document envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JfgError {
    /// The document `type` member is missing or not a JSON-FG kind.
    #[error("unsupported document type: {0}")]
    UnsupportedKind(String),

    /// A `FeatureCollection` has no `features` member.
    #[error("FeatureCollection has no \"features\" member")]
    MissingFeatures,

    /// A `FeatureCollection`'s `features` member is not an array.
    #[error("FeatureCollection \"features\" must be an array, found {found}")]
    FeaturesNotArray {
        /// JSON kind of the offending value.
        found: &'static str,
    },
}

/// Errors interpreting `time` members.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    /// The value is not a string.
    #[error("expected a string, found {found}")]
    NotAString {
        /// JSON kind of the offending value.
        found: &'static str,
    },

    /// The string is not an RFC 3339 full-date (`YYYY-MM-DD`).
    #[error("\"{value}\" is not an RFC 3339 full-date ({reason})")]
    InvalidDate {
        /// The rejected string.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The string is not an RFC 3339 date-time.
    #[error("\"{value}\" is not an RFC 3339 date-time ({reason})")]
    InvalidTimestamp {
        /// The rejected string.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An interval bound is neither a date, a date-time, nor `".."`.
    #[error("\"{0}\" is not a full-date, a date-time, or \"..\"")]
    InvalidBound(String),

    /// The interval does not have exactly two members.
    #[error("interval must have exactly 2 members, found {0}")]
    IntervalArity(usize),

    /// The interval is not an array.
    #[error("interval must be an array, found {found}")]
    IntervalNotArray {
        /// JSON kind of the offending value.
        found: &'static str,
    },
}

/// Errors traversing geometry objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// A geometry is not a JSON object.
    #[error("{path}: geometry must be an object, found {found}")]
    NotAnObject {
        /// JSON Pointer of the offending value.
        path: String,
        /// JSON kind of the offending value.
        found: &'static str,
    },

    /// `coordinates` (or `geometries`) is present but not an array.
    #[error("{path}: expected an array, found {found}")]
    NotAnArray {
        /// JSON Pointer of the offending value.
        path: String,
        /// JSON kind of the offending value.
        found: &'static str,
    },
}
