//! # Run Results and Reports
//!
//! [`RunResult`] is the value returned by one engine run: a [`Verdict`]
//! (`Pass` or a non-empty ordered list of [`Failure`]s), the outcome of
//! every enumerated assertion, and whether the run completed.
//!
//! [`EtsReport`] is the serialisable form printed by the command line:
//!
//! ```json
//! {"ets-report": {"summary": {"PASSED": 6, "FAILED": 1, "SKIPPED": 1, "NOT_RUN": 0},
//!                 "complete": true,
//!                 "tests": [{"id": "...", "code": "FAILED", "message": "1 error(s)", "errors": ["..."]}]}}
//! ```

use serde::{Deserialize, Serialize};

use crate::assertion::{Finding, TEST_ID_BASE};

/// One content failure, tagged with the class and assertion that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Conformance class id.
    pub class: String,
    /// Assertion code.
    pub assertion: String,
    /// JSON Pointer of the offending value, when one applies.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
    /// Self-contained description.
    pub message: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path.as_deref() {
            Some("") => write!(f, "[{}] (root): {}", self.assertion, self.message),
            Some(path) => write!(f, "[{}] {path}: {}", self.assertion, self.message),
            None => write!(f, "[{}] {}", self.assertion, self.message),
        }
    }
}

/// What happened to one assertion during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Passed,
    Failed(Vec<Finding>),
    Skipped(String),
    /// The time budget expired before the assertion started.
    NotRun,
}

/// Outcome of one enumerated assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionOutcome {
    /// Conformance class id.
    pub class: String,
    /// Assertion code.
    pub code: String,
    /// What happened.
    pub status: Status,
}

impl AssertionOutcome {
    /// Full URI of the assertion.
    pub fn uri(&self) -> String {
        format!("{TEST_ID_BASE}/{}", self.code)
    }

    fn failures(&self) -> impl Iterator<Item = Failure> + '_ {
        let findings: &[Finding] = match &self.status {
            Status::Failed(findings) => findings,
            _ => &[],
        };
        findings.iter().map(|finding| Failure {
            class: self.class.clone(),
            assertion: self.code.clone(),
            path: finding.path.clone(),
            message: finding.message.clone(),
        })
    }
}

/// Pass, or the ordered failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Never empty.
    Failures(Vec<Failure>),
}

/// Aggregated outcome of one run. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    verdict: Verdict,
    outcomes: Vec<AssertionOutcome>,
    complete: bool,
}

impl RunResult {
    /// Build from outcomes in class, assertion order.
    pub(crate) fn from_outcomes(outcomes: Vec<AssertionOutcome>) -> Self {
        let failures: Vec<Failure> = outcomes.iter().flat_map(|o| o.failures()).collect();
        let complete = !outcomes.iter().any(|o| o.status == Status::NotRun);
        let verdict = if failures.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Failures(failures)
        };
        Self {
            verdict,
            outcomes,
            complete,
        }
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.verdict, Verdict::Pass)
    }

    /// Ordered failures; empty on pass.
    pub fn failures(&self) -> &[Failure] {
        match &self.verdict {
            Verdict::Pass => &[],
            Verdict::Failures(failures) => failures,
        }
    }

    pub fn outcomes(&self) -> &[AssertionOutcome] {
        &self.outcomes
    }

    /// False when the time budget left assertions unstarted.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Per-status counts.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for outcome in &self.outcomes {
            match outcome.status {
                Status::Passed => summary.passed += 1,
                Status::Failed(_) => summary.failed += 1,
                Status::Skipped(_) => summary.skipped += 1,
                Status::NotRun => summary.not_run += 1,
            }
        }
        summary
    }

    /// The serialisable report.
    pub fn to_report(&self) -> EtsReport {
        EtsReport {
            report: ReportBody {
                summary: self.summary(),
                complete: self.complete,
                tests: self.outcomes.iter().map(TestEntry::from).collect(),
            },
        }
    }
}

/// Top-level report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtsReport {
    #[serde(rename = "ets-report")]
    pub report: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBody {
    pub summary: Summary,
    pub complete: bool,
    pub tests: Vec<TestEntry>,
}

/// Assertion counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_run: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestCode {
    Passed,
    Failed,
    Skipped,
    NotRun,
}

/// One assertion in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEntry {
    pub id: String,
    pub code: TestCode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl From<&AssertionOutcome> for TestEntry {
    fn from(outcome: &AssertionOutcome) -> Self {
        let (code, message, errors) = match &outcome.status {
            Status::Passed => (TestCode::Passed, None, Vec::new()),
            Status::Failed(findings) => (
                TestCode::Failed,
                Some(format!("{} error(s)", findings.len())),
                findings.iter().map(Finding::to_string).collect(),
            ),
            Status::Skipped(reason) => (TestCode::Skipped, Some(reason.clone()), Vec::new()),
            Status::NotRun => (
                TestCode::NotRun,
                Some("time budget expired".to_string()),
                Vec::new(),
            ),
        };
        Self {
            id: outcome.uri(),
            code,
            message,
            errors,
        }
    }
}
