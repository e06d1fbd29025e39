//! # Geometry Traversal
//!
//! Walks a GeoJSON / JSON-FG geometry object and yields every position
//! (innermost coordinate array) together with its JSON Pointer.
//!
//! Handles `coordinates` nesting of any depth, `GeometryCollection`
//! (`geometries`) and the JSON-FG `Prism` (`base`). Positions containing
//! anything other than numbers are not yielded; their shape is the schema's
//! concern.

use serde_json::Value;

use crate::error::GeometryError;
use crate::{json_kind, pointer_join};

/// One numeric position and where it lives in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// JSON Pointer of the position array.
    pub path: String,
    /// The ordinates, in document order.
    pub coordinates: Vec<f64>,
}

impl Position {
    /// Number of ordinates.
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// First ordinate (longitude for WGS 84).
    pub fn x(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    /// Second ordinate (latitude for WGS 84).
    pub fn y(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }
}

/// Collect every numeric position of `geometry`, whose pointer is `base_path`.
///
/// # Errors
///
/// Returns [`GeometryError`] when a geometry is not an object or its
/// `coordinates` / `geometries` member is not an array.
pub fn positions(geometry: &Value, base_path: &str) -> Result<Vec<Position>, GeometryError> {
    let mut out = Vec::new();
    walk_geometry(geometry, base_path, &mut out)?;
    Ok(out)
}

fn walk_geometry(
    geometry: &Value,
    path: &str,
    out: &mut Vec<Position>,
) -> Result<(), GeometryError> {
    let object = geometry.as_object().ok_or_else(|| GeometryError::NotAnObject {
        path: path.to_string(),
        found: json_kind(geometry),
    })?;

    if let Some(coordinates) = object.get("coordinates") {
        let coordinates_path = pointer_join(path, "coordinates");
        if !coordinates.is_array() {
            return Err(GeometryError::NotAnArray {
                path: coordinates_path,
                found: json_kind(coordinates),
            });
        }
        walk_coordinates(coordinates, &coordinates_path, out);
    }

    if let Some(members) = object.get("geometries") {
        let members_path = pointer_join(path, "geometries");
        let items = members.as_array().ok_or_else(|| GeometryError::NotAnArray {
            path: members_path.clone(),
            found: json_kind(members),
        })?;
        for (i, member) in items.iter().enumerate() {
            walk_geometry(member, &pointer_join(&members_path, &i.to_string()), out)?;
        }
    }

    // Prism
    if let Some(base) = object.get("base") {
        walk_geometry(base, &pointer_join(path, "base"), out)?;
    }

    Ok(())
}

fn walk_coordinates(value: &Value, path: &str, out: &mut Vec<Position>) {
    let Some(items) = value.as_array() else {
        return;
    };
    if items.is_empty() {
        return;
    }
    if items.iter().any(Value::is_array) {
        for (i, item) in items.iter().enumerate() {
            walk_coordinates(item, &pointer_join(path, &i.to_string()), out);
        }
        return;
    }
    let coordinates: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
    if let Some(coordinates) = coordinates {
        out.push(Position {
            path: path.to_string(),
            coordinates,
        });
    }
}
