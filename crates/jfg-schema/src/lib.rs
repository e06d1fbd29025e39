//! # jfg-schema: JSON-FG Schema Bundle
//!
//! Everything the validator knows about the published JSON-FG schemas.
//!
//! ## Schema Resource (`resource`)
//!
//! [`SchemaResource`] loads the synced bundle once and answers two
//! questions: "what is the schema called `feature.json`?" and "which JSON
//! Schema errors does this instance have against it?". Cross-schema
//! `$ref`s resolve against the bundle only.
//!
//! ## Bundle Sync (`bundle`)
//!
//! [`bundle::sync`] downloads the OGC archive and replaces the local bundle
//! directory; [`bundle::sync_from_archive`] does the same from a file.
//!
//! ## Configuration (`config`)
//!
//! [`BundleConfig::from_env`] locates the bundle directory, archive URL and
//! schema version.
//!
//! ## Crate Policy
//!
//! - No internal dependencies; the engine crate brings the two together.
//! - Schema validation never touches the network.

pub mod bundle;
pub mod config;
pub mod resource;

pub use bundle::{BundleError, SyncSummary};
pub use config::{BundleConfig, ConfigError};
pub use resource::{ResourceError, SchemaResource, SchemaViolation};
