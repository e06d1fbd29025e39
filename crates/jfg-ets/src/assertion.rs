//! # Assertions
//!
//! An assertion is one checkable conformance requirement: a stable code,
//! a description, and a check descriptor. Checks come in two forms:
//!
//! - [`Check::Schema`] validates the document (or the sub-document at a
//!   JSON Pointer) against one schema of the bundle and turns every JSON
//!   Schema error into a [`Finding`].
//! - [`Check::Rule`] is a plain function over the document, used for
//!   requirements JSON Schema cannot express (cross-member consistency,
//!   enumerated values, coordinate ranges).
//!
//! ## Fault Isolation
//!
//! [`Assertion::evaluate`] never propagates an error or a panic. A check
//! that cannot run (unknown document kind, missing schema, schema that does
//! not compile) yields one precondition finding; a panicking rule is caught
//! at this boundary and yields one `assertion aborted` finding. Sibling
//! assertions are unaffected either way.

use std::panic::{catch_unwind, AssertUnwindSafe};

use jfg_core::FeatureKind;
use jfg_schema::SchemaResource;
use serde_json::Value;

use crate::options::ValidationOptions;

/// Prefix of every assertion and conformance class URI.
pub const TEST_ID_BASE: &str = "http://www.opengis.net/spec/json-fg-1/0.2";

/// Rule function signature.
pub type Rule = fn(&Value) -> Evaluation;

/// One failure description produced by an assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// JSON Pointer of the offending value, when one applies.
    pub path: Option<String>,
    /// Self-contained description, quoting the offending value.
    pub message: String,
}

impl Finding {
    /// A finding located at `path`.
    pub fn at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            message: message.into(),
        }
    }

    /// A finding not tied to any location.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path.as_deref() {
            Some("") => write!(f, "(root): {}", self.message),
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of evaluating one assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The check ran. No findings means it passed.
    Completed(Vec<Finding>),
    /// The check does not apply to this document or run.
    Skipped(String),
}

impl Evaluation {
    /// A completed evaluation without findings.
    pub fn pass() -> Self {
        Self::Completed(Vec::new())
    }
}

/// Which bundle schema a schema-backed assertion validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSelector {
    /// A fixed schema name.
    Named(&'static str),
    /// `feature.json` or `featurecollection.json`, by the document `type`.
    ByFeatureKind,
}

/// Schema-backed check descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaCheck {
    /// Schema to validate against.
    pub selector: SchemaSelector,
    /// Validate only the sub-document at this JSON Pointer.
    pub pointer: Option<&'static str>,
}

/// How an assertion is checked.
#[derive(Clone, Copy)]
pub enum Check {
    /// Delegate to JSON Schema validation.
    Schema(SchemaCheck),
    /// Evaluate an explicit predicate.
    Rule(Rule),
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(check) => f.debug_tuple("Schema").field(check).finish(),
            Self::Rule(_) => f.write_str("Rule(..)"),
        }
    }
}

/// A registered conformance assertion. Immutable once built.
#[derive(Debug, Clone)]
pub struct Assertion {
    /// Stable code relative to [`TEST_ID_BASE`], e.g. `req/core/metadata`.
    pub code: &'static str,
    /// Human-readable requirement text.
    pub description: &'static str,
    /// The check.
    pub check: Check,
}

impl Assertion {
    /// A schema-backed assertion.
    pub const fn schema(code: &'static str, description: &'static str, check: SchemaCheck) -> Self {
        Self {
            code,
            description,
            check: Check::Schema(check),
        }
    }

    /// A rule-backed assertion.
    pub const fn rule(code: &'static str, description: &'static str, rule: Rule) -> Self {
        Self {
            code,
            description,
            check: Check::Rule(rule),
        }
    }

    /// Full URI of the requirement.
    pub fn uri(&self) -> String {
        format!("{TEST_ID_BASE}/{}", self.code)
    }

    /// Whether this assertion delegates to the schema bundle.
    pub fn is_schema_backed(&self) -> bool {
        matches!(self.check, Check::Schema(_))
    }

    /// Evaluate against `document`. Never panics, never fails.
    pub fn evaluate(
        &self,
        document: &Value,
        schemas: &SchemaResource,
        options: &ValidationOptions,
    ) -> Evaluation {
        let outcome = catch_unwind(AssertUnwindSafe(|| match self.check {
            Check::Schema(check) => evaluate_schema(check, document, schemas, options),
            Check::Rule(rule) => rule(document),
        }));

        match outcome {
            Ok(evaluation) => evaluation,
            Err(payload) => {
                let reason = panic_payload_to_string(payload.as_ref());
                tracing::warn!(assertion = self.code, %reason, "assertion aborted");
                Evaluation::Completed(vec![Finding::general(format!("assertion aborted: {reason}"))])
            }
        }
    }
}

fn evaluate_schema(
    check: SchemaCheck,
    document: &Value,
    schemas: &SchemaResource,
    options: &ValidationOptions,
) -> Evaluation {
    if !options.enforce_schema {
        return Evaluation::Skipped("schema enforcement disabled".to_string());
    }

    let name = match check.selector {
        SchemaSelector::Named(name) => name,
        SchemaSelector::ByFeatureKind => match FeatureKind::of(document) {
            Ok(kind) => kind.schema_name(),
            Err(e) => {
                return Evaluation::Completed(vec![Finding::at(
                    "/type",
                    format!("cannot select a schema: {e}"),
                )])
            }
        },
    };

    let (base, instance) = match check.pointer {
        Some(pointer) => match document.pointer(pointer) {
            Some(instance) => (pointer, instance),
            None => {
                return Evaluation::Completed(vec![Finding::at(
                    pointer,
                    format!("member validated against {name} is missing"),
                )])
            }
        },
        None => ("", document),
    };

    match schemas.validate(name, instance) {
        Ok(violations) => Evaluation::Completed(
            violations
                .into_iter()
                .map(|v| {
                    Finding::at(
                        format!("{base}{}", v.instance_path),
                        format!("{} (schema rule {name}#{})", v.message, v.schema_path),
                    )
                })
                .collect(),
        ),
        Err(e) => Evaluation::Completed(vec![Finding::general(format!("precondition failed: {e}"))]),
    }
}

fn panic_payload_to_string(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
