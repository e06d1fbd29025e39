//! # Feature Kinds
//!
//! A JSON-FG document is either a single `Feature` or a
//! `FeatureCollection`. The kind decides which schema of the bundle applies
//! and where the per-feature members (`time`, `place`, `geometry`) live.

use serde_json::Value;

use crate::error::JfgError;
use crate::{describe_value, pointer_join};

/// The JSON-FG document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// A single feature.
    Feature,
    /// A collection of features under the `features` member.
    FeatureCollection,
}

impl FeatureKind {
    /// Determine the kind from the document's `type` member.
    ///
    /// # Errors
    ///
    /// Returns [`JfgError::UnsupportedKind`] if `type` is missing, not a
    /// string, or names something other than a JSON-FG document kind.
    pub fn of(document: &Value) -> Result<Self, JfgError> {
        match document.get("type") {
            Some(Value::String(s)) => Self::from_type_name(s)
                .ok_or_else(|| JfgError::UnsupportedKind(format!("\"{s}\""))),
            Some(other) => Err(JfgError::UnsupportedKind(describe_value(other))),
            None => Err(JfgError::UnsupportedKind("missing \"type\" member".to_string())),
        }
    }

    /// Parse the literal `type` value.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Feature" => Some(Self::Feature),
            "FeatureCollection" => Some(Self::FeatureCollection),
            _ => None,
        }
    }

    /// The literal `type` value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::FeatureCollection => "FeatureCollection",
        }
    }

    /// File name of the bundle schema governing this kind.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::Feature => "feature.json",
            Self::FeatureCollection => "featurecollection.json",
        }
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enumerate the features of a document together with their JSON Pointers.
///
/// A `FeatureCollection` yields each member of `features` as
/// `/features/<i>`; anything else (including documents whose `type` is
/// missing or unknown) is treated as a single feature rooted at `""`.
///
/// # Errors
///
/// [`JfgError::MissingFeatures`] or [`JfgError::FeaturesNotArray`] when a
/// `FeatureCollection` has no `features` array.
pub fn features(document: &Value) -> Result<Vec<(String, &Value)>, JfgError> {
    if !matches!(FeatureKind::of(document), Ok(FeatureKind::FeatureCollection)) {
        return Ok(vec![(String::new(), document)]);
    }

    match document.get("features") {
        Some(Value::Array(items)) => Ok(items
            .iter()
            .enumerate()
            .map(|(i, feature)| (pointer_join("/features", &i.to_string()), feature))
            .collect()),
        Some(other) => Err(JfgError::FeaturesNotArray {
            found: crate::json_kind(other),
        }),
        None => Err(JfgError::MissingFeatures),
    }
}
