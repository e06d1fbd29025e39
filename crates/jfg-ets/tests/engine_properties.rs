//! Integration tests: the JSON-FG Core suite run end to end against the
//! fixture bundle under `tests/fixtures/bundle`.
//!
//! Covers the reporting guarantees of the engine: completeness (no
//! fail-fast), deterministic ordering, option sensitivity, idempotent pass,
//! fault isolation, time budgets, and the environmental error cases.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use jfg_ets::{
    core_class, AbstractTestSuite, Assertion, ConformanceClass, Document, EtsError, Evaluation,
    SchemaCheck, SchemaSelector, Status, TestSuiteEngine, ValidationOptions, Verdict,
};
use jfg_schema::SchemaResource;
use proptest::prelude::*;
use serde_json::{json, Value};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn bundle() -> &'static SchemaResource {
    static BUNDLE: OnceLock<SchemaResource> = OnceLock::new();
    BUNDLE.get_or_init(|| {
        SchemaResource::load(fixtures().join("bundle"), "0.1.1").expect("fixture bundle loads")
    })
}

fn document(name: &str) -> Document {
    let bytes = std::fs::read(fixtures().join("documents").join(name)).unwrap();
    Document::from_slice(&bytes).unwrap()
}

fn codes(doc: &Document, options: &ValidationOptions) -> Vec<String> {
    TestSuiteEngine::new(doc, bundle())
        .run_tests(options)
        .unwrap()
        .failures()
        .iter()
        .map(|f| f.assertion.clone())
        .collect()
}

// ---- scenarios ----

#[test]
fn minimal_feature_passes() {
    let result = TestSuiteEngine::new(&document("minimal-feature.json"), bundle())
        .run_tests(&ValidationOptions::default())
        .unwrap();
    assert_eq!(result.verdict(), &Verdict::Pass);
    assert!(result.is_complete());
    assert_eq!(result.outcomes().len(), 9);
    // time is null: the four temporal rules are enumerated as skipped.
    assert_eq!(result.summary().skipped, 4);
}

#[test]
fn missing_conforms_to_is_one_metadata_failure() {
    let result = TestSuiteEngine::new(&document("missing-conformsto.json"), bundle())
        .run_tests(&ValidationOptions::default())
        .unwrap();
    let failures = result.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].assertion, "req/core/metadata");
    assert_eq!(failures[0].class, "core");
    assert_eq!(failures[0].path.as_deref(), Some("/conformsTo"));
}

#[test]
fn duplicated_place_and_bad_coordinate_yield_two_failures_in_order() {
    let doc = document("place-duplicates-geometry.json");
    assert_eq!(
        codes(&doc, &ValidationOptions::default()),
        vec!["req/core/schema-valid", "req/core/place"]
    );
}

#[test]
fn wgs84_place_next_to_time_fails_the_place_rule() {
    let doc = Document::from_value(json!({
        "type": "Feature",
        "conformsTo": ["[ogc-json-fg-1-0.2:core]"],
        "time": {"timestamp": "2023-01-15T10:00:00Z"},
        "place": {"type": "Point", "coordinates": [7.0, 51.0]},
        "geometry": {"type": "Point", "coordinates": [7.0, 51.0]},
        "properties": {}
    }));
    let result = TestSuiteEngine::new(&doc, bundle())
        .run_tests(&ValidationOptions::default())
        .unwrap();
    assert!(!result.is_pass());
    let failures = result.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].assertion, "req/core/place");
    assert_eq!(failures[0].path.as_deref(), Some("/place"));
}

#[test]
fn broken_features_member_is_reported_once() {
    let doc = Document::from_value(json!({
        "type": "FeatureCollection",
        "conformsTo": ["[ogc-json-fg-1-0.2:core]"],
        "features": 3
    }));
    let result = TestSuiteEngine::new(&doc, bundle())
        .run_tests(&ValidationOptions::default())
        .unwrap();
    let failures = result.failures();
    assert_eq!(failures.len(), 1, "{failures:?}");
    assert_eq!(failures[0].assertion, "req/core/schema-valid");
    assert!(failures.iter().all(|f| !f.to_string().contains("/features: /features")));

    let skipped: Vec<&str> = result
        .outcomes()
        .iter()
        .filter_map(|o| match &o.status {
            Status::Skipped(reason) => Some(reason.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(skipped.len(), 7);
    assert!(skipped.iter().all(|r| r.starts_with("cannot enumerate features: ")));
}

#[test]
fn collection_failures_carry_member_paths() {
    let result = TestSuiteEngine::new(&document("collection.json"), bundle())
        .run_tests(&ValidationOptions::default())
        .unwrap();
    let failures = result.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].assertion, "req/core/utc");
    assert_eq!(failures[0].path.as_deref(), Some("/features/1/time/timestamp"));
}

#[test]
fn malformed_input_is_environmental() {
    let err = Document::from_slice(b"{\"type\": \"Feature\",").unwrap_err();
    assert!(matches!(err, EtsError::MalformedInput(_)));
}

// ---- completeness ----

#[test]
fn independent_violations_are_all_reported() {
    let doc = Document::from_value(json!({
        "type": "Feature",
        "time": {"date": "2023-13-45", "timestamp": "2023-01-15T10:00:00+02:00"},
        "place": {"type": "LineString", "coordinates": [[0, 0], [1, 1, 1]]},
        "geometry": {"type": "Point", "coordinates": [200, 10]},
        "properties": {}
    }));
    assert_eq!(
        codes(&doc, &ValidationOptions::default()),
        vec![
            "req/core/metadata",
            "req/core/instant",
            "req/core/utc",
            "req/core/coordinate-dimension",
            "req/core/geometry-wgs84",
            "req/core/place",
        ]
    );
}

// ---- option sensitivity ----

#[test]
fn schema_only_violation_follows_enforcement() {
    let doc = Document::from_value(json!({
        "type": "Feature",
        "conformsTo": ["[ogc-json-fg-1-0.2:core]"],
        "geometry": null,
        "properties": 5
    }));

    assert_eq!(codes(&doc, &ValidationOptions::default()), vec!["req/core/schema-valid"]);

    let relaxed = ValidationOptions::default().with_enforce_schema(false);
    let result = TestSuiteEngine::new(&doc, bundle()).run_tests(&relaxed).unwrap();
    assert!(result.is_pass());
    assert_eq!(
        result.outcomes()[0].status,
        Status::Skipped("schema enforcement disabled".to_string())
    );
}

#[test]
fn disabled_enforcement_runs_without_a_bundle() {
    let empty = SchemaResource::empty();
    let result = TestSuiteEngine::new(&document("minimal-feature.json"), &empty)
        .run_tests(&ValidationOptions::default().with_enforce_schema(false))
        .unwrap();
    assert!(result.is_pass());
}

#[test]
fn conforming_document_passes_under_every_option() {
    let doc = document("minimal-feature.json");
    for enforce in [true, false] {
        for budget in [None, Some(Duration::from_secs(60))] {
            let mut options = ValidationOptions::default().with_enforce_schema(enforce);
            options.time_budget = budget;
            let result = TestSuiteEngine::new(&doc, bundle()).run_tests(&options).unwrap();
            assert!(result.is_pass(), "enforce={enforce} budget={budget:?}");
        }
    }
}

// ---- fault isolation ----

fn always_panics(_: &Value) -> Evaluation {
    panic!("rule bug")
}

#[test]
fn broken_assertions_do_not_stop_their_siblings() {
    let suite = AbstractTestSuite::new(vec![
        ConformanceClass {
            id: "broken",
            title: "Deliberately broken",
            assertions: vec![
                Assertion::schema(
                    "req/broken/missing-schema",
                    "references a schema the bundle does not have",
                    SchemaCheck {
                        selector: SchemaSelector::Named("missing.json"),
                        pointer: None,
                    },
                ),
                Assertion::rule("req/broken/panics", "panics", always_panics),
            ],
        },
        core_class(),
    ]);

    let doc = document("missing-conformsto.json");
    let result = TestSuiteEngine::new(&doc, bundle())
        .with_suite(&suite)
        .run_tests(&ValidationOptions::default())
        .unwrap();

    let codes: Vec<&str> = result.failures().iter().map(|f| f.assertion.as_str()).collect();
    assert_eq!(
        codes,
        vec!["req/broken/missing-schema", "req/broken/panics", "req/core/metadata"]
    );
    assert!(result.failures()[0].message.contains("missing.json"));
    assert!(result.failures()[1].message.starts_with("assertion aborted"));
    assert_eq!(result.outcomes().len(), 11);
}

// ---- options and budgets ----

#[test]
fn zero_budget_is_invalid() {
    let err = TestSuiteEngine::new(&document("minimal-feature.json"), bundle())
        .run_tests(&ValidationOptions::default().with_time_budget(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, EtsError::InvalidOptions(_)));
}

#[test]
fn unknown_class_is_invalid() {
    let err = TestSuiteEngine::new(&document("minimal-feature.json"), bundle())
        .run_tests(&ValidationOptions::default().with_classes(["core", "3d"]))
        .unwrap_err();
    assert_eq!(
        err,
        EtsError::InvalidOptions(vec!["unknown conformance class '3d'".to_string()])
    );
}

#[test]
fn expired_budget_marks_the_run_incomplete() {
    let result = TestSuiteEngine::new(&document("minimal-feature.json"), bundle())
        .run_tests(&ValidationOptions::default().with_time_budget(Duration::from_nanos(1)))
        .unwrap();
    assert!(!result.is_complete());
    assert_eq!(result.outcomes().last().map(|o| &o.status), Some(&Status::NotRun));
    let report = serde_json::to_value(result.to_report()).unwrap();
    assert_eq!(report["ets-report"]["complete"], false);
}

// ---- concurrency ----

#[test]
fn concurrent_runs_share_one_bundle() {
    let docs = [document("collection.json"), document("place-duplicates-geometry.json")];
    let results: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = docs
            .iter()
            .map(|doc| scope.spawn(move || codes(doc, &ValidationOptions::default())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results[0], vec!["req/core/utc"]);
    assert_eq!(results[1].len(), 2);
}

// ---- determinism ----

fn arb_feature() -> impl Strategy<Value = Value> {
    (
        prop::bool::ANY,
        prop::collection::vec(prop::collection::vec(-400.0f64..400.0, 2..=3), 1..6),
        prop::sample::select(vec!["Z", "+00:00", "+05:30", "-08:00"]),
        prop::option::of(prop::sample::select(vec!["2023-01-01", "2023-06-31", "2024-02-29"])),
        prop::bool::ANY,
    )
        .prop_map(|(declare, coords, offset, date, as_string)| {
            let mut feature = json!({
                "type": "Feature",
                "time": {"timestamp": format!("2023-06-15T12:00:00{offset}")},
                "geometry": {"type": "MultiPoint", "coordinates": coords},
                "place": null,
                "properties": {}
            });
            if declare {
                feature["conformsTo"] = json!(["[ogc-json-fg-1-0.2:core]"]);
            }
            if let Some(date) = date {
                feature["time"]["date"] = json!(date);
            }
            if as_string {
                feature["properties"] = json!("not an object");
            }
            feature
        })
}

proptest! {
    #[test]
    fn identical_runs_produce_identical_results(feature in arb_feature(), enforce in prop::bool::ANY) {
        let doc = Document::from_value(feature);
        let options = ValidationOptions::default().with_enforce_schema(enforce);
        let engine = TestSuiteEngine::new(&doc, bundle());
        let first = engine.run_tests(&options).unwrap();
        let second = engine.run_tests(&options).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.to_report(), second.to_report());
    }

    #[test]
    fn disabling_enforcement_only_removes_schema_failures(feature in arb_feature()) {
        let doc = Document::from_value(feature);
        let engine = TestSuiteEngine::new(&doc, bundle());
        let strict = engine.run_tests(&ValidationOptions::default()).unwrap();
        let relaxed = engine
            .run_tests(&ValidationOptions::default().with_enforce_schema(false))
            .unwrap();
        let expected: Vec<_> = strict
            .failures()
            .iter()
            .filter(|f| f.assertion != "req/core/schema-valid")
            .cloned()
            .collect();
        prop_assert_eq!(relaxed.failures(), expected.as_slice());
    }
}
