//! Rule relating `place` to `geometry`.
//!
//! `place` carries geometries that `geometry` cannot: a coordinate
//! reference system other than WGS 84, or a JSON-FG type with no GeoJSON
//! counterpart (`Polyhedron`, `Prism`, ...). A GeoJSON geometry in WGS 84
//! belongs in `geometry`, and `place` must then be `null`.
//!
//! The CRS in effect is the nearest `coordRefSys`: on `place` itself, then
//! on the feature, then on the enclosing collection. None means WGS 84.

use serde_json::Value;

use super::per_feature_with_context;
use crate::assertion::{Evaluation, Finding};

/// `coordRefSys` values that denote WGS 84 longitude/latitude.
pub const WGS84_CRS: [&str; 4] = [
    "http://www.opengis.net/def/crs/OGC/1.3/CRS84",
    "[OGC:CRS84]",
    "http://www.opengis.net/def/crs/OGC/0/CRS84h",
    "[OGC:CRS84h]",
];

const GEOJSON_TYPES: [&str; 6] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
];

/// `req/core/place`: `place` is not a GeoJSON geometry in WGS 84.
pub fn place_not_geojson_wgs84(document: &Value) -> Evaluation {
    per_feature_with_context(document, &["place"], |path, feature, place, findings| {
        if !place.is_object() {
            return;
        }
        let crs = [place, feature, document]
            .into_iter()
            .find_map(|holder| holder.get("coordRefSys").filter(|crs| !crs.is_null()));
        if !is_wgs84(crs) || !is_geojson(place) {
            return;
        }
        let kind = place.get("type").and_then(Value::as_str).unwrap_or("geometry");
        findings.push(Finding::at(
            path,
            format!(
                "place is a GeoJSON {kind} in WGS 84 (coordRefSys {}); it belongs in geometry and place must be null",
                match crs {
                    Some(crs) => jfg_core::describe_value(crs),
                    None => "absent".to_string(),
                }
            ),
        ));
    })
}

fn is_wgs84(crs: Option<&Value>) -> bool {
    let reference = match crs {
        None => return true,
        Some(Value::String(uri)) => uri.as_str(),
        Some(Value::Object(reference)) => match reference.get("href").and_then(Value::as_str) {
            Some(href) => href,
            None => return false,
        },
        // Compound CRS arrays are never plain WGS 84.
        Some(_) => return false,
    };
    WGS84_CRS.contains(&reference)
}

fn is_geojson(geometry: &Value) -> bool {
    match geometry.get("type").and_then(Value::as_str) {
        Some("GeometryCollection") => geometry
            .get("geometries")
            .and_then(Value::as_array)
            .is_some_and(|members| members.iter().all(is_geojson)),
        Some(kind) => GEOJSON_TYPES.contains(&kind),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn completed(eval: Evaluation) -> Vec<Finding> {
        match eval {
            Evaluation::Completed(findings) => findings,
            Evaluation::Skipped(reason) => panic!("skipped: {reason}"),
        }
    }

    #[test]
    fn wgs84_point_duplicating_geometry_fails() {
        let doc = json!({
            "type": "Feature",
            "time": {"date": "2023-01-15"},
            "place": {"type": "Point", "coordinates": [7.0, 51.0]},
            "geometry": {"type": "Point", "coordinates": [7.0, 51.0]}
        });
        let f = completed(place_not_geojson_wgs84(&doc));
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].path.as_deref(), Some("/place"));
        assert!(f[0].message.contains("GeoJSON Point in WGS 84"));
    }

    #[test]
    fn explicit_crs84_still_fails() {
        let doc = json!({
            "type": "Feature",
            "coordRefSys": "[OGC:CRS84]",
            "place": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}
        });
        assert_eq!(completed(place_not_geojson_wgs84(&doc)).len(), 1);
    }

    #[test]
    fn projected_place_passes() {
        let doc = json!({
            "type": "Feature",
            "coordRefSys": "http://www.opengis.net/def/crs/EPSG/0/25832",
            "place": {"type": "Point", "coordinates": [395000.0, 5712000.0]}
        });
        assert!(completed(place_not_geojson_wgs84(&doc)).is_empty());
    }

    #[test]
    fn crs_reference_on_place_overrides_the_feature() {
        let doc = json!({
            "type": "Feature",
            "coordRefSys": "[OGC:CRS84]",
            "place": {
                "type": "Point",
                "coordRefSys": {"type": "Reference", "href": "http://www.opengis.net/def/crs/EPSG/0/3857"},
                "coordinates": [780000.0, 6600000.0]
            }
        });
        assert!(completed(place_not_geojson_wgs84(&doc)).is_empty());
    }

    #[test]
    fn collection_crs_applies_to_members() {
        let doc = json!({
            "type": "FeatureCollection",
            "coordRefSys": "http://www.opengis.net/def/crs/EPSG/0/25832",
            "features": [
                {"type": "Feature", "place": {"type": "Point", "coordinates": [395000.0, 5712000.0]}},
                {"type": "Feature", "coordRefSys": "[OGC:CRS84]", "place": {"type": "Point", "coordinates": [7, 51]}}
            ]
        });
        let f = completed(place_not_geojson_wgs84(&doc));
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].path.as_deref(), Some("/features/1/place"));
    }

    #[test]
    fn json_fg_only_types_pass_in_wgs84() {
        let doc = json!({
            "type": "Feature",
            "place": {"type": "Prism", "base": {"type": "Point", "coordinates": [7, 51]}, "upper": 10}
        });
        assert!(completed(place_not_geojson_wgs84(&doc)).is_empty());

        let mixed = json!({
            "type": "Feature",
            "place": {"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [7, 51]},
                {"type": "Polyhedron", "coordinates": []}
            ]}
        });
        assert!(completed(place_not_geojson_wgs84(&mixed)).is_empty());
    }

    #[test]
    fn null_place_is_skipped() {
        let doc = json!({"type": "Feature", "place": null, "geometry": {"type": "Point", "coordinates": [7, 51]}});
        assert!(matches!(place_not_geojson_wgs84(&doc), Evaluation::Skipped(_)));
    }

    #[test]
    fn wrong_kind_place_is_left_to_the_schema() {
        let doc = json!({"type": "Feature", "place": "POINT(7 51)"});
        assert!(completed(place_not_geojson_wgs84(&doc)).is_empty());
    }
}
