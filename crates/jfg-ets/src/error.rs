//! Environmental errors.
//!
//! A run that returns one of these could not be completed; it says nothing
//! about whether the document conforms. Content problems are never errors,
//! they are failures inside [`crate::RunResult`].

use jfg_schema::ResourceError;
use thiserror::Error;

/// Hard failures of a validation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EtsError {
    /// The input is not JSON, or its root is not a JSON object.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Schema-backed assertions are enforced but no bundle is available.
    #[error("schema bundle unavailable: {0}")]
    BundleUnavailable(String),

    /// The run options are inconsistent with the suite.
    #[error("invalid options: {}", .0.join("; "))]
    InvalidOptions(Vec<String>),
}

impl From<ResourceError> for EtsError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::BundleUnavailable { .. } => Self::BundleUnavailable(err.to_string()),
            other => Self::BundleUnavailable(format!("bundle cannot be loaded: {other}")),
        }
    }
}
