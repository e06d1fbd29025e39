//! Rules over `geometry` and `place`.

use jfg_core::{positions, Position};
use serde_json::Value;

use super::per_feature;
use crate::assertion::{Evaluation, Finding};

/// `req/core/coordinate-dimension`: within `geometry`, and separately
/// within `place`, every position has the same number of ordinates.
pub fn coordinate_dimension(document: &Value) -> Evaluation {
    per_feature(document, &["geometry", "place"], |path, geometry, findings| {
        let found = match positions(geometry, path) {
            Ok(found) => found,
            Err(e) => {
                findings.push(Finding::at(path, e.to_string()));
                return;
            }
        };
        let Some(first) = found.first() else {
            return;
        };
        if let Some(other) = found.iter().find(|p| p.dimension() != first.dimension()) {
            findings.push(Finding::at(
                path,
                format!(
                    "positions have inconsistent dimensions: {} has {}, {} has {}",
                    first.path,
                    first.dimension(),
                    other.path,
                    other.dimension()
                ),
            ));
        }
    })
}

/// `req/core/geometry-wgs84`: every `geometry` position has longitude in
/// [-180, 180] and latitude in [-90, 90]. `place` may use another CRS and
/// is not checked.
pub fn geometry_wgs84(document: &Value) -> Evaluation {
    per_feature(document, &["geometry"], |path, geometry, findings| {
        match positions(geometry, path) {
            Ok(found) => findings.extend(found.iter().filter_map(out_of_bounds)),
            Err(e) => findings.push(Finding::at(path, e.to_string())),
        }
    })
}

fn out_of_bounds(position: &Position) -> Option<Finding> {
    let (lon, lat) = (position.x()?, position.y()?);
    if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
        return None;
    }
    Some(Finding::at(
        position.path.clone(),
        format!("position ({lon}, {lat}) is outside WGS 84 bounds (longitude -180..180, latitude -90..90)"),
    ))
}
