//! Rules over the `time` member.
//!
//! Each rule reports only its own concern: an unparseable `date` is an
//! `instant` failure and is ignored by `instant-and-interval` and `utc`.

use jfg_core::{describe_value, json_kind, pointer_join, Interval, IntervalBound, TemporalInstant};
use serde_json::{Map, Value};

use super::per_feature;
use crate::assertion::{Evaluation, Finding};

/// `req/core/instant`: `date` is a full-date, `timestamp` a date-time.
pub fn instant(document: &Value) -> Evaluation {
    per_feature(document, &["time"], |path, time, findings| {
        let Some(time) = time_object(path, time, findings) else {
            return;
        };
        if let Some(date) = present(time.get("date")) {
            if let Err(e) = TemporalInstant::date_from_value(date) {
                findings.push(Finding::at(pointer_join(path, "date"), e.to_string()));
            }
        }
        if let Some(timestamp) = present(time.get("timestamp")) {
            if let Err(e) = TemporalInstant::timestamp_from_value(timestamp) {
                findings.push(Finding::at(pointer_join(path, "timestamp"), e.to_string()));
            }
        }
    })
}

/// `req/core/interval`: two well-formed bounds, start not after end.
pub fn interval(document: &Value) -> Evaluation {
    per_feature(document, &["time"], |path, time, findings| {
        let Some(time) = time_object(path, time, findings) else {
            return;
        };
        let Some(value) = present(time.get("interval")) else {
            return;
        };
        let interval_path = pointer_join(path, "interval");

        let Some(items) = value.as_array() else {
            findings.push(Finding::at(
                interval_path,
                format!("interval must be an array, found {}", json_kind(value)),
            ));
            return;
        };
        if items.len() != 2 {
            findings.push(Finding::at(
                interval_path,
                format!("interval must have exactly 2 members, found {}", items.len()),
            ));
            return;
        }

        let mut bounds = Vec::with_capacity(2);
        for (i, item) in items.iter().enumerate() {
            match IntervalBound::from_value(item) {
                Ok(bound) => bounds.push(bound),
                Err(e) => findings.push(Finding::at(pointer_join(&interval_path, &i.to_string()), e.to_string())),
            }
        }
        if let [start, end] = bounds[..] {
            if !(Interval { start, end }).is_ordered() {
                findings.push(Finding::at(
                    interval_path,
                    format!("interval start is after its end: {}", describe_value(value)),
                ));
            }
        }
    })
}

/// `req/core/instant-and-interval`: `date` and `timestamp` share the
/// full-date, and both lie inside `interval` (ends included).
pub fn instant_and_interval(document: &Value) -> Evaluation {
    per_feature(document, &["time"], |path, time, findings| {
        let Some(time) = time_object(path, time, findings) else {
            return;
        };
        let date = parsed(time, "date", TemporalInstant::date_from_value);
        let timestamp = parsed(time, "timestamp", TemporalInstant::timestamp_from_value);
        let interval = present(time.get("interval"))
            .and_then(|v| Interval::from_value(v).ok().map(|i| (v, i)))
            .filter(|(_, i)| i.is_ordered());

        if let (Some((date_raw, date)), Some((ts_raw, ts))) = (&date, &timestamp) {
            if date.date() != ts.date() {
                findings.push(Finding::at(
                    path,
                    format!("date {date_raw} and timestamp {ts_raw} do not share the same full-date"),
                ));
            }
        }

        if let Some((interval_raw, interval)) = interval {
            for (member, instant) in [("date", &date), ("timestamp", &timestamp)] {
                if let Some((raw, instant)) = instant {
                    if !interval.contains(instant) {
                        findings.push(Finding::at(
                            path,
                            format!("{member} {raw} lies outside the interval {}", describe_value(interval_raw)),
                        ));
                    }
                }
            }
        }
    })
}

/// `req/core/utc`: `timestamp` and date-time interval bounds use UTC.
pub fn utc(document: &Value) -> Evaluation {
    per_feature(document, &["time"], |path, time, findings| {
        let Some(time) = time_object(path, time, findings) else {
            return;
        };
        if let Some((raw, ts)) = parsed(time, "timestamp", TemporalInstant::timestamp_from_value) {
            if !ts.is_utc() {
                findings.push(Finding::at(
                    pointer_join(path, "timestamp"),
                    format!("timestamp {raw} is not in UTC"),
                ));
            }
        }

        let Some(items) = time.get("interval").and_then(Value::as_array) else {
            return;
        };
        let interval_path = pointer_join(path, "interval");
        for (i, item) in items.iter().enumerate() {
            if let Ok(IntervalBound::At(bound)) = IntervalBound::from_value(item) {
                if bound.is_timestamp() && !bound.is_utc() {
                    findings.push(Finding::at(
                        pointer_join(&interval_path, &i.to_string()),
                        format!("interval bound {} is not in UTC", describe_value(item)),
                    ));
                }
            }
        }
    })
}

fn time_object<'a>(path: &str, time: &'a Value, findings: &mut Vec<Finding>) -> Option<&'a Map<String, Value>> {
    let object = time.as_object();
    if object.is_none() {
        findings.push(Finding::at(
            path,
            format!("time must be an object or null, found {}", json_kind(time)),
        ));
    }
    object
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// A member parsed with `parse`, paired with its quoted source text.
fn parsed<E>(
    time: &Map<String, Value>,
    member: &str,
    parse: fn(&Value) -> Result<TemporalInstant, E>,
) -> Option<(String, TemporalInstant)> {
    let value = present(time.get(member))?;
    parse(value).ok().map(|instant| (describe_value(value), instant))
}
