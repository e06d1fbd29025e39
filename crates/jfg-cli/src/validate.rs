//! # `ets validate`
//!
//! Runs the JSON-FG executable test suite against one document and prints
//! the report on stdout.
//!
//! Exit codes: [`EXIT_PASS`] when the document conforms, [`EXIT_FAILURES`]
//! when any assertion failed, [`EXIT_INCOMPLETE`] when validation could not
//! be completed (unreadable source, non-JSON input, missing bundle, invalid
//! options, expired time budget).

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, ValueEnum};
use jfg_ets::{Document, EtsError, RunResult, TestSuiteEngine, ValidationOptions};
use jfg_schema::{BundleConfig, SchemaResource};

use crate::logging::LogArgs;
use crate::source;

pub const EXIT_PASS: u8 = 0;
pub const EXIT_FAILURES: u8 = 1;
pub const EXIT_INCOMPLETE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The `ets-report` JSON document.
    Json,
    /// One line per failure.
    Text,
}

/// Arguments for `ets validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path or http(s) URL of the document to validate.
    #[arg(value_name = "FILE_OR_URL")]
    pub source: String,

    /// Fail when the document does not validate against the JSON-FG schemas (default).
    #[arg(short = 'f', long = "fail-on-schema-validation", overrides_with = "no_fail_on_schema_validation")]
    pub fail_on_schema_validation: bool,

    /// Skip the schema-backed assertions.
    #[arg(long = "no-fail-on-schema-validation", overrides_with = "fail_on_schema_validation")]
    pub no_fail_on_schema_validation: bool,

    /// Run only this conformance class (repeatable).
    #[arg(long = "class", value_name = "ID")]
    pub classes: Vec<String>,

    /// Stop starting assertions after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    pub time_budget_secs: Option<u64>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub log: LogArgs,
}

impl ValidateArgs {
    /// Engine options selected by the flags.
    pub fn options(&self) -> ValidationOptions {
        let mut options = ValidationOptions::default().with_enforce_schema(!self.no_fail_on_schema_validation);
        if !self.classes.is_empty() {
            options = options.with_classes(self.classes.iter().cloned());
        }
        if let Some(secs) = self.time_budget_secs {
            options = options.with_time_budget(Duration::from_secs(secs));
        }
        options
    }
}

/// Execute `ets validate`, writing the report to `out`.
///
/// Validation outcomes are exit codes. An `Err` means the report itself
/// could not be written.
pub fn run_validate(args: &ValidateArgs, config: &BundleConfig, out: &mut impl Write) -> anyhow::Result<u8> {
    let options = args.options();

    let bytes = match source::read(&args.source, config.timeout) {
        Ok(bytes) => bytes,
        Err(e) => return Ok(incomplete(&e)),
    };
    let document = match Document::from_slice(&bytes) {
        Ok(document) => document,
        Err(e) => return Ok(incomplete(&e)),
    };
    let schemas = match load_schemas(config, options.enforce_schema) {
        Ok(schemas) => schemas,
        Err(e) => return Ok(incomplete(&e)),
    };

    let result = match TestSuiteEngine::new(&document, &schemas).run_tests(&options) {
        Ok(result) => result,
        Err(e) => return Ok(incomplete(&e)),
    };

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result.to_report()).context("cannot write report")?;
            writeln!(out).context("cannot write report")?;
        }
        OutputFormat::Text => write_text(&result, &args.source, out).context("cannot write report")?,
    }

    Ok(exit_code(&result))
}

/// Load the bundle. Without schema enforcement a missing bundle is not
/// needed, so an empty resource stands in for it.
fn load_schemas(config: &BundleConfig, enforce_schema: bool) -> Result<SchemaResource, EtsError> {
    match SchemaResource::load(&config.bundle_dir, &config.schema_version) {
        Ok(schemas) => {
            tracing::debug!(schemas = schemas.len(), version = schemas.version(), "schema bundle loaded");
            Ok(schemas)
        }
        Err(e) if !enforce_schema => {
            tracing::warn!(error = %e, "continuing without schemas");
            Ok(SchemaResource::empty())
        }
        Err(e) => Err(e.into()),
    }
}

fn exit_code(result: &RunResult) -> u8 {
    if !result.is_complete() {
        EXIT_INCOMPLETE
    } else if result.is_pass() {
        EXIT_PASS
    } else {
        EXIT_FAILURES
    }
}

fn incomplete(error: &dyn std::fmt::Display) -> u8 {
    tracing::error!("could not complete validation: {error}");
    eprintln!("could not complete validation: {error}");
    EXIT_INCOMPLETE
}

fn write_text(result: &RunResult, source: &str, out: &mut impl Write) -> std::io::Result<()> {
    let failures = result.failures();
    let status = if result.is_complete() {
        match failures.len() {
            0 => "valid".to_string(),
            1 => "invalid, 1 failure".to_string(),
            n => format!("invalid, {n} failures"),
        }
    } else {
        format!("incomplete, {} failure(s) so far", failures.len())
    };
    writeln!(out, "{source}: {status}")?;
    for failure in failures {
        writeln!(out, "  {failure}")?;
    }
    if !result.is_complete() {
        let summary = result.summary();
        writeln!(out, "  time budget expired: {} assertion(s) not run", summary.not_run)?;
    }
    Ok(())
}
