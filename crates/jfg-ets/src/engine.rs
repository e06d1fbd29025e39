//! # Test Suite Engine
//!
//! Runs the selected conformance classes of a suite against one document
//! and aggregates every failure into a [`RunResult`].
//!
//! ## Algorithm
//!
//! 1. Validate the options against the suite (`InvalidOptions`), the
//!    document precondition (`MalformedInput`: the root must be a JSON
//!    object) and the bundle precondition (`BundleUnavailable`: schemas are
//!    enforced but none are loaded). These are the only fail-fast cases.
//! 2. Evaluate each selected class in registry order, each assertion in
//!    declaration order. No failure suppresses a later assertion.
//! 3. Return `Pass` when nothing failed, otherwise the failures ordered by
//!    class, assertion, then emission order.
//!
//! Identical documents and options always produce identical results;
//! nothing in a run depends on shared mutable state.

use std::time::Instant;

use jfg_core::json_kind;
use jfg_schema::SchemaResource;

use crate::catalog::json_fg_suite;
use crate::conformance::AbstractTestSuite;
use crate::document::Document;
use crate::error::EtsError;
use crate::options::ValidationOptions;
use crate::report::RunResult;

/// Borrows one document and one schema resource for the length of a run.
#[derive(Debug, Clone, Copy)]
pub struct TestSuiteEngine<'a> {
    document: &'a Document,
    schemas: &'a SchemaResource,
    suite: &'a AbstractTestSuite,
}

impl<'a> TestSuiteEngine<'a> {
    /// An engine running the JSON-FG suite.
    pub fn new(document: &'a Document, schemas: &'a SchemaResource) -> Self {
        Self {
            document,
            schemas,
            suite: json_fg_suite(),
        }
    }

    /// Run another suite instead.
    pub fn with_suite(mut self, suite: &'a AbstractTestSuite) -> Self {
        self.suite = suite;
        self
    }

    /// Run the selected classes.
    ///
    /// # Errors
    ///
    /// Only environmental problems: [`EtsError::InvalidOptions`],
    /// [`EtsError::MalformedInput`], [`EtsError::BundleUnavailable`].
    /// Content problems are failures inside the returned [`RunResult`].
    pub fn run_tests(&self, options: &ValidationOptions) -> Result<RunResult, EtsError> {
        let classes = self.suite.select(options)?;

        let root = self.document.root();
        if !root.is_object() {
            return Err(EtsError::MalformedInput(format!(
                "document root must be a JSON object, found {}",
                json_kind(root)
            )));
        }

        let needs_schemas = options.enforce_schema
            && classes
                .iter()
                .any(|c| c.assertions.iter().any(|a| a.is_schema_backed()));
        if needs_schemas && self.schemas.is_empty() {
            return Err(EtsError::BundleUnavailable(
                "no schemas loaded; run 'json-fg-validator bundle sync' to cache".to_string(),
            ));
        }

        let deadline = options.time_budget.map(|budget| Instant::now() + budget);
        let outcomes = classes
            .iter()
            .flat_map(|class| class.evaluate(root, self.schemas, options, deadline))
            .collect();
        let result = RunResult::from_outcomes(outcomes);

        let summary = result.summary();
        tracing::info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            not_run = summary.not_run,
            failures = result.failures().len(),
            "test suite run finished"
        );
        if !result.is_complete() {
            tracing::warn!(not_run = summary.not_run, "time budget expired before all assertions ran");
        }
        Ok(result)
    }
}
