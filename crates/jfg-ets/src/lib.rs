//! # jfg-ets: Executable Test Suite for JSON-FG Core
//!
//! Decides whether a JSON document conforms to "OGC Features and
//! Geometries JSON - Part 1: Core".
//!
//! ```text
//! Document ──► TestSuiteEngine::run_tests(options)
//!                 └─► ConformanceClass (registry order)
//!                       └─► Assertion (declaration order)
//!                             ├─ Check::Schema ─► SchemaResource::validate
//!                             └─ Check::Rule   ─► fn(&Value) -> Evaluation
//!              ◄── RunResult { Pass | Failures([...]), outcomes, complete }
//! ```
//!
//! Content problems never abort a run: every assertion is evaluated and
//! every failure is reported. Only environmental problems (non-JSON
//! input, a missing schema bundle, invalid options) produce an
//! [`EtsError`].
//!
//! ## Adding a Requirement
//!
//! Write a rule `fn(&Value) -> Evaluation` and register it as an
//! [`Assertion`] in a [`ConformanceClass`]. The engine is unchanged.

pub mod assertion;
pub mod catalog;
pub mod conformance;
pub mod document;
pub mod engine;
pub mod error;
pub mod options;
pub mod report;

pub use assertion::{Assertion, Check, Evaluation, Finding, SchemaCheck, SchemaSelector, TEST_ID_BASE};
pub use catalog::{core_class, json_fg_suite, CORE_CLASS_ID};
pub use conformance::{AbstractTestSuite, ConformanceClass};
pub use document::Document;
pub use engine::TestSuiteEngine;
pub use error::EtsError;
pub use options::ValidationOptions;
pub use report::{AssertionOutcome, EtsReport, Failure, RunResult, Status, Summary, TestCode, Verdict};
