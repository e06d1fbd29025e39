//! # jfg-core: Foundational Types for the JSON-FG Validator
//!
//! This crate holds the domain primitives every other crate in the
//! workspace builds on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Documents are borrowed, never owned or mutated.** Everything here
//!    operates on `&serde_json::Value` and returns findings or typed values.
//!
//! 2. **Single `FeatureKind` enum.** The two JSON-FG document kinds
//!    (`Feature`, `FeatureCollection`) are matched exhaustively wherever the
//!    validator needs to pick a schema or iterate features.
//!
//! 3. **Typed temporal values.** `time.date`, `time.timestamp` and
//!    `time.interval` members parse into [`TemporalInstant`] and [`IntervalBound`]
//!    so that comparison rules never compare raw strings.
//!
//! 4. **Path-carrying geometry traversal.** [`geometry::positions`] yields
//!    every position together with its JSON Pointer, so that a failure can
//!    quote exactly where the offending coordinate lives.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jfg-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod geometry;
pub mod kind;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{GeometryError, JfgError, TemporalError};
pub use geometry::{positions, Position};
pub use kind::{features, FeatureKind};
pub use temporal::{Interval, IntervalBound, TemporalInstant};

/// Build a JSON Pointer by appending one reference token to `base`.
///
/// Escapes `~` and `/` per RFC 6901 so that member names containing
/// either character still produce a resolvable pointer.
pub fn pointer_join(base: &str, token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    format!("{base}/{escaped}")
}

/// Short, single-line rendering of a JSON value for failure messages.
///
/// Long values are truncated so that a failure quoting a whole geometry
/// does not flood the report.
pub fn describe_value(value: &serde_json::Value) -> String {
    const LIMIT: usize = 80;
    let rendered = value.to_string();
    if rendered.chars().count() > LIMIT {
        let head: String = rendered.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        rendered
    }
}

/// Name of the JSON kind of a value (`"object"`, `"array"`, ...).
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
