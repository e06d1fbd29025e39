//! The document under test.

use std::str::FromStr;

use jfg_core::FeatureKind;
use serde_json::Value;

use crate::error::EtsError;

/// A parsed JSON document. Read-only for the lifetime of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Parse raw bytes.
    ///
    /// # Errors
    ///
    /// [`EtsError::MalformedInput`] with line and column of the first
    /// syntax error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EtsError> {
        serde_json::from_slice(bytes)
            .map(Self::from_value)
            .map_err(|e| EtsError::MalformedInput(format!("not valid JSON: {e}")))
    }

    /// Wrap an already parsed value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The root value.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Document kind, if `type` names one.
    pub fn kind(&self) -> Option<FeatureKind> {
        FeatureKind::of(&self.root).ok()
    }
}

impl FromStr for Document {
    type Err = EtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_reports_position() {
        let err = Document::from_slice(b"{\"type\": \"Feature\",\n  oops}").unwrap_err();
        match err {
            EtsError::MalformedInput(msg) => assert!(msg.contains("line 2"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn from_str_and_kind() {
        let doc: Document = r#"{"type": "FeatureCollection", "features": []}"#.parse().unwrap();
        assert_eq!(doc.kind(), Some(FeatureKind::FeatureCollection));
    }

    #[test]
    fn unknown_kind_is_none() {
        let doc = Document::from_value(json!({"type": "Topology"}));
        assert_eq!(doc.kind(), None);
    }
}
