//! # JSON-FG Core Catalog
//!
//! The assertions of the JSON-FG Part 1 "Core" conformance class, in
//! report order:
//!
//! | Code | Check |
//! |------|-------|
//! | `req/core/schema-valid` | schema (`feature.json` / `featurecollection.json`) |
//! | `req/core/metadata` | [`metadata::conforms_to_core`] |
//! | `req/core/instant` | [`temporal::instant`] |
//! | `req/core/interval` | [`temporal::interval`] |
//! | `req/core/instant-and-interval` | [`temporal::instant_and_interval`] |
//! | `req/core/utc` | [`temporal::utc`] |
//! | `req/core/coordinate-dimension` | [`geometry::coordinate_dimension`] |
//! | `req/core/geometry-wgs84` | [`geometry::geometry_wgs84`] |
//! | `req/core/place` | [`place::place_not_geojson_wgs84`] |
//!
//! Rules over `time`, `geometry` and `place` run once per feature: for a
//! `FeatureCollection` every member of `features`, with paths prefixed by
//! `/features/<i>`. A member that is `null` or absent in every feature
//! makes the rule `Skipped`. So does a `FeatureCollection` without a
//! `features` array: that is a schema violation, reported once by
//! `req/core/schema-valid`.

use std::sync::OnceLock;

use serde_json::Value;

use crate::assertion::{Assertion, Evaluation, Finding, SchemaCheck, SchemaSelector};
use crate::conformance::{AbstractTestSuite, ConformanceClass};

pub mod geometry;
pub mod metadata;
pub mod place;
pub mod temporal;

/// Id of the Core conformance class.
pub const CORE_CLASS_ID: &str = "core";

/// The process-wide JSON-FG suite. Built on first use, read-only after.
pub fn json_fg_suite() -> &'static AbstractTestSuite {
    static SUITE: OnceLock<AbstractTestSuite> = OnceLock::new();
    SUITE.get_or_init(|| AbstractTestSuite::new(vec![core_class()]))
}

/// The JSON-FG Core conformance class.
pub fn core_class() -> ConformanceClass {
    ConformanceClass {
        id: CORE_CLASS_ID,
        title: "JSON-FG Core",
        assertions: vec![
            Assertion::schema(
                "req/core/schema-valid",
                "The document is valid against the JSON-FG Feature or FeatureCollection schema.",
                SchemaCheck {
                    selector: SchemaSelector::ByFeatureKind,
                    pointer: None,
                },
            ),
            Assertion::rule(
                "req/core/metadata",
                "The conformsTo member declares the JSON-FG Core conformance class.",
                metadata::conforms_to_core,
            ),
            Assertion::rule(
                "req/core/instant",
                "time.date is an RFC 3339 full-date and time.timestamp an RFC 3339 date-time.",
                temporal::instant,
            ),
            Assertion::rule(
                "req/core/interval",
                "time.interval has two members, each a full-date, a date-time or \"..\", start not after end.",
                temporal::interval,
            ),
            Assertion::rule(
                "req/core/instant-and-interval",
                "date, timestamp and interval in one time object describe consistent instants.",
                temporal::instant_and_interval,
            ),
            Assertion::rule(
                "req/core/utc",
                "Date-time values in time use UTC.",
                temporal::utc,
            ),
            Assertion::rule(
                "req/core/coordinate-dimension",
                "All positions of a geometry have the same dimension.",
                geometry::coordinate_dimension,
            ),
            Assertion::rule(
                "req/core/geometry-wgs84",
                "geometry positions are WGS 84 longitude/latitude within range.",
                geometry::geometry_wgs84,
            ),
            Assertion::rule(
                "req/core/place",
                "place is null when it holds a GeoJSON geometry in WGS 84; such a geometry belongs in geometry.",
                place::place_not_geojson_wgs84,
            ),
        ],
    }
}

/// Run `check` on each non-null occurrence of each of `members` across the
/// features of `document`.
///
/// `check` receives the member's JSON Pointer and value and pushes
/// findings. The result is `Skipped` when no feature carries any of the
/// members.
pub(crate) fn per_feature<F>(document: &Value, members: &[&str], mut check: F) -> Evaluation
where
    F: FnMut(&str, &Value, &mut Vec<Finding>),
{
    per_feature_with_context(document, members, |path, _, value, findings| {
        check(path, value, findings)
    })
}

/// Like [`per_feature`], but `check` also receives the enclosing feature.
pub(crate) fn per_feature_with_context<F>(document: &Value, members: &[&str], mut check: F) -> Evaluation
where
    F: FnMut(&str, &Value, &Value, &mut Vec<Finding>),
{
    let features = match jfg_core::features(document) {
        Ok(features) => features,
        Err(e) => return Evaluation::Skipped(format!("cannot enumerate features: {e}")),
    };

    let mut findings = Vec::new();
    let mut checked = false;
    for (base, feature) in features {
        for member in members {
            match feature.get(member) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    checked = true;
                    check(&jfg_core::pointer_join(&base, member), feature, value, &mut findings);
                }
            }
        }
    }

    if checked {
        Evaluation::Completed(findings)
    } else {
        Evaluation::Skipped(format!("{} is null or absent", members.join(" and ")))
    }
}
