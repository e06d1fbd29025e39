//! Conformance classes and the suite registry.

use std::time::Instant;

use jfg_schema::SchemaResource;
use serde_json::Value;

use crate::assertion::{Assertion, Evaluation, TEST_ID_BASE};
use crate::error::EtsError;
use crate::options::ValidationOptions;
use crate::report::{AssertionOutcome, Failure, Status};

/// A named, ordered group of assertions.
#[derive(Debug, Clone)]
pub struct ConformanceClass {
    /// Short id, e.g. `core`.
    pub id: &'static str,
    pub title: &'static str,
    /// Evaluated in this order.
    pub assertions: Vec<Assertion>,
}

impl ConformanceClass {
    /// Full URI of the class, as declared in `conformsTo`.
    pub fn uri(&self) -> String {
        format!("{TEST_ID_BASE}/conf/{}", self.id)
    }

    /// Evaluate every assertion and concatenate their failures.
    pub fn run(
        &self,
        document: &Value,
        schemas: &SchemaResource,
        options: &ValidationOptions,
    ) -> Vec<Failure> {
        let outcomes = self.evaluate(document, schemas, options, None);
        crate::report::RunResult::from_outcomes(outcomes).failures().to_vec()
    }

    /// Evaluate every assertion in declaration order.
    ///
    /// Before each assertion the deadline, if any, is checked; once it has
    /// passed, the remaining assertions are reported [`Status::NotRun`].
    pub fn evaluate(
        &self,
        document: &Value,
        schemas: &SchemaResource,
        options: &ValidationOptions,
        deadline: Option<Instant>,
    ) -> Vec<AssertionOutcome> {
        self.assertions
            .iter()
            .map(|assertion| {
                let status = if deadline.is_some_and(|d| Instant::now() >= d) {
                    Status::NotRun
                } else {
                    match assertion.evaluate(document, schemas, options) {
                        Evaluation::Completed(findings) if findings.is_empty() => Status::Passed,
                        Evaluation::Completed(findings) => Status::Failed(findings),
                        Evaluation::Skipped(reason) => Status::Skipped(reason),
                    }
                };
                tracing::debug!(class = self.id, assertion = assertion.code, ?status, "assertion evaluated");
                AssertionOutcome {
                    class: self.id.to_string(),
                    code: assertion.code.to_string(),
                    status,
                }
            })
            .collect()
    }
}

/// Ordered registry of conformance classes.
#[derive(Debug, Clone, Default)]
pub struct AbstractTestSuite {
    classes: Vec<ConformanceClass>,
}

impl AbstractTestSuite {
    pub fn new(classes: Vec<ConformanceClass>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[ConformanceClass] {
        &self.classes
    }

    /// Look up a class by id.
    pub fn class(&self, id: &str) -> Option<&ConformanceClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Classes selected by `options`, in registry order.
    ///
    /// # Errors
    ///
    /// [`EtsError::InvalidOptions`] listing every problem with the options.
    pub fn select(&self, options: &ValidationOptions) -> Result<Vec<&ConformanceClass>, EtsError> {
        let mut problems = options.problems();

        let selected = match &options.classes {
            None => self.classes.iter().collect(),
            Some(ids) => {
                for id in ids {
                    if self.class(id).is_none() {
                        problems.push(format!("unknown conformance class '{id}'"));
                    }
                }
                self.classes
                    .iter()
                    .filter(|c| ids.iter().any(|id| id == c.id))
                    .collect()
            }
        };

        if problems.is_empty() {
            Ok(selected)
        } else {
            Err(EtsError::InvalidOptions(problems))
        }
    }
}
