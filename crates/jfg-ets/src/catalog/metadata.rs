//! `req/core/metadata`: the document declares JSON-FG Core.

use jfg_core::{describe_value, json_kind};
use serde_json::Value;

use crate::assertion::{Evaluation, Finding};

/// URIs and CURIEs accepted as a declaration of JSON-FG Core.
pub const CORE_CONFORMANCE_URIS: [&str; 4] = [
    "http://www.opengis.net/spec/json-fg-1/0.2/conf/core",
    "[ogc-json-fg-1-0.2:core]",
    "http://www.opengis.net/spec/json-fg-1/0.1/conf/core",
    "[ogc-json-fg-1-0.1:core]",
];

/// The root `conformsTo` member is an array including a Core URI.
pub fn conforms_to_core(document: &Value) -> Evaluation {
    let finding = match document.get("conformsTo") {
        None => Finding::at("/conformsTo", "missing conformsTo member"),
        Some(declared @ Value::Array(items)) => {
            let declares_core = items
                .iter()
                .filter_map(Value::as_str)
                .any(|uri| CORE_CONFORMANCE_URIS.contains(&uri));
            if declares_core {
                return Evaluation::pass();
            }
            Finding::at(
                "/conformsTo",
                format!(
                    "does not declare JSON-FG Core ({}); found {}",
                    CORE_CONFORMANCE_URIS[0],
                    describe_value(declared)
                ),
            )
        }
        Some(other) => Finding::at(
            "/conformsTo",
            format!("conformsTo must be an array of URIs, found {}", json_kind(other)),
        ),
    };
    Evaluation::Completed(vec![finding])
}
