//! # jfg-cli: `json-fg-validator` command line
//!
//! ## Subcommands
//!
//! - `ets validate FILE_OR_URL`: run the JSON-FG executable test suite and
//!   print the `ets-report`
//! - `bundle sync`: download the JSON-FG schemas into the local bundle
//!
//! Argument parsing lives in `main.rs`; handlers here take parsed
//! arguments, a [`jfg_schema::BundleConfig`] and an output writer so they
//! can be driven from tests.

pub mod bundle;
pub mod logging;
pub mod source;
pub mod validate;
