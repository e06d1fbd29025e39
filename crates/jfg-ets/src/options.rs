//! Run options.

use std::time::Duration;

/// Recognised options for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOptions {
    /// When false, schema-backed assertions are reported as skipped and
    /// contribute no failures.
    pub enforce_schema: bool,
    /// Restrict the run to these conformance class ids. `None` runs all.
    pub classes: Option<Vec<String>>,
    /// Wall-clock budget. Assertions not started before it expires are
    /// reported as not run and the result is marked incomplete.
    pub time_budget: Option<Duration>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            enforce_schema: true,
            classes: None,
            time_budget: None,
        }
    }
}

impl ValidationOptions {
    /// Toggle schema enforcement.
    pub fn with_enforce_schema(mut self, enforce: bool) -> Self {
        self.enforce_schema = enforce;
        self
    }

    /// Restrict the run to the given class ids.
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes = Some(classes.into_iter().map(Into::into).collect());
        self
    }

    /// Set a wall-clock budget.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Problems detectable without knowing the suite.
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.time_budget.is_some_and(|b| b.is_zero()) {
            problems.push("time budget must be greater than zero".to_string());
        }
        if self.classes.as_ref().is_some_and(Vec::is_empty) {
            problems.push("class selection is empty".to_string());
        }
        problems
    }
}
