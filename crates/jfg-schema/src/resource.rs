//! # Schema Resource
//!
//! Read-only view of a synced JSON-FG schema bundle, plus JSON Schema
//! (Draft 2020-12) validation against its members.
//!
//! ## Schema Resolution
//!
//! Schemas are indexed by their path relative to the version directory
//! (e.g. `feature.json`, `geometry-objects.json`) and by their `$id`.
//! Cross-schema `$ref`s are resolved by a local retriever: first by full
//! URI against the `$id` index, then by file name. The retriever never
//! performs network requests; a reference that resolves to nothing makes
//! the schema fail to compile.
//!
//! ## Thread Safety
//!
//! `SchemaResource` is `Send + Sync` and immutable after loading, so one
//! instance can back any number of concurrent validation runs.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use thiserror::Error;

/// Local retriever resolving `$ref` URIs against the loaded bundle.
struct LocalSchemaRetriever {
    /// Map from `$id` URI or relative name to schema value.
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Fragments are applied by the validator after retrieval.
        let without_fragment = uri_str.split('#').next().unwrap_or(uri_str);
        let filename = without_fragment
            .rsplit('/')
            .next()
            .unwrap_or(without_fragment);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("schema {uri_str} is not part of the local bundle").into())
    }
}

/// Errors loading or using the schema bundle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The bundle directory for the requested version does not exist.
    #[error("JSON-FG schemas missing at {}; run 'json-fg-validator bundle sync' to cache", path.display())]
    BundleUnavailable {
        /// The directory that was looked for.
        path: PathBuf,
    },

    /// A bundle file could not be read or parsed.
    #[error("cannot load schema '{name}': {reason}")]
    ResourceLoad {
        /// Relative name of the offending file.
        name: String,
        /// Why loading failed.
        reason: String,
    },

    /// A requested schema is not in the bundle.
    #[error("schema '{0}' not found in the bundle")]
    ResourceNotFound(String),

    /// A schema could not be compiled into a validator.
    #[error("schema '{name}' does not compile: {reason}")]
    SchemaCompile {
        /// Relative name of the schema.
        name: String,
        /// Compiler message.
        reason: String,
    },
}

/// A single JSON Schema error with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Immutable lookup of bundle schemas by logical name.
#[derive(Debug, Clone, Default)]
pub struct SchemaResource {
    /// Version directory the schemas were read from, if any.
    root: Option<PathBuf>,
    /// Schema version label (e.g. `0.1.1`).
    version: String,
    /// Relative name to parsed schema, sorted.
    schemas: BTreeMap<String, Value>,
    /// Retrieval index shared with every compiled validator.
    by_uri: Arc<HashMap<String, Value>>,
}

impl SchemaResource {
    /// Load every `*.json` file under `<bundle_dir>/json-fg/<version>/`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::BundleUnavailable`] if the version directory
    /// does not exist, [`ResourceError::ResourceLoad`] if a file cannot be
    /// read or is not JSON.
    pub fn load(bundle_dir: impl AsRef<Path>, version: &str) -> Result<Self, ResourceError> {
        let root = bundle_dir.as_ref().join("json-fg").join(version);
        Self::load_dir(&root, version)
    }

    /// Load every `*.json` file under an explicit version directory.
    pub fn load_dir(root: &Path, version: &str) -> Result<Self, ResourceError> {
        if !root.is_dir() {
            return Err(ResourceError::BundleUnavailable {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        collect_json_files(root, root, &mut files)?;
        files.sort();

        let mut schemas = BTreeMap::new();
        for (name, path) in files {
            let content = std::fs::read_to_string(&path).map_err(|e| ResourceError::ResourceLoad {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            let value: Value = serde_json::from_str(&content).map_err(|e| ResourceError::ResourceLoad {
                name: name.clone(),
                reason: format!("invalid JSON: {e}"),
            })?;
            schemas.insert(name, value);
        }

        tracing::debug!(dir = %root.display(), count = schemas.len(), "loaded schema bundle");
        Ok(Self::from_schemas(Some(root.to_path_buf()), version, schemas))
    }

    /// A resource with no entries, used when schema enforcement is off and
    /// no bundle has been synced.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a resource from in-memory schemas keyed by relative name.
    pub fn from_schemas(
        root: Option<PathBuf>,
        version: &str,
        schemas: BTreeMap<String, Value>,
    ) -> Self {
        let mut by_uri = HashMap::new();
        for (name, value) in &schemas {
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                by_uri.insert(id.to_string(), value.clone());
            }
            by_uri.insert(name.clone(), value.clone());
            // Bare file name for nested entries.
            if let Some(file) = name.rsplit('/').next() {
                by_uri.entry(file.to_string()).or_insert_with(|| value.clone());
            }
        }
        Self {
            root,
            version: version.to_string(),
            schemas,
            by_uri: Arc::new(by_uri),
        }
    }

    /// Look up a schema by relative name.
    pub fn resolve(&self, name: &str) -> Result<&Value, ResourceError> {
        self.schemas
            .get(name)
            .ok_or_else(|| ResourceError::ResourceNotFound(name.to_string()))
    }

    /// Relative names of all loaded schemas, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Number of loaded schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// True if no schema is loaded.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Version directory the schemas were read from.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Validate `instance` against the named schema.
    ///
    /// Returns every JSON Schema error, in validator order. An empty list
    /// means the instance is valid.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ResourceNotFound`] if the schema is not loaded,
    /// [`ResourceError::SchemaCompile`] if it cannot be compiled.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<Vec<SchemaViolation>, ResourceError> {
        let schema = self.resolve(name)?;

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(LocalSchemaRetriever {
                schemas_by_uri: Arc::clone(&self.by_uri),
            })
            .build(schema)
            .map_err(|e| ResourceError::SchemaCompile {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(validator
            .iter_errors(instance)
            .map(|e| SchemaViolation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect())
    }
}

fn collect_json_files(
    root: &Path,
    dir: &Path,
    out: &mut Vec<(String, PathBuf)>,
) -> Result<(), ResourceError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ResourceError::ResourceLoad {
        name: dir.display().to_string(),
        reason: format!("cannot read directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ResourceError::ResourceLoad {
            name: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(root, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            out.push((name, path));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(schemas: Vec<(&str, Value)>) -> SchemaResource {
        let map = schemas
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        SchemaResource::from_schemas(None, "test", map)
    }

    fn point_bundle() -> SchemaResource {
        resource(vec![
            (
                "point.json",
                json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "$id": "https://example.org/schemas/point.json",
                    "type": "object",
                    "required": ["coordinates"],
                    "properties": {
                        "coordinates": {"$ref": "coords.json"}
                    }
                }),
            ),
            (
                "coords.json",
                json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "$id": "https://example.org/schemas/coords.json",
                    "type": "array",
                    "items": {"type": "number"}
                }),
            ),
        ])
    }

    #[test]
    fn empty_resource_has_no_names() {
        let r = SchemaResource::empty();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert!(r.root().is_none());
    }

    #[test]
    fn resolve_unknown_name() {
        let err = point_bundle().resolve("feature.json").unwrap_err();
        assert_eq!(err, ResourceError::ResourceNotFound("feature.json".to_string()));
    }

    #[test]
    fn names_are_sorted() {
        assert_eq!(point_bundle().names(), vec!["coords.json", "point.json"]);
    }

    #[test]
    fn validate_resolves_relative_refs_locally() {
        let r = point_bundle();
        assert!(r.validate("point.json", &json!({"coordinates": [1, 2]})).unwrap().is_empty());

        let violations = r.validate("point.json", &json!({"coordinates": [1, "x"]})).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/coordinates/1");
    }

    #[test]
    fn validate_reports_every_error() {
        let r = point_bundle();
        let violations = r.validate("point.json", &json!({"coordinates": ["a", "b"]})).unwrap();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn unresolvable_ref_fails_to_compile() {
        let r = resource(vec![(
            "broken.json",
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "$id": "https://example.org/schemas/broken.json",
                "$ref": "missing.json"
            }),
        )]);
        let err = r.validate("broken.json", &json!({})).unwrap_err();
        assert!(matches!(err, ResourceError::SchemaCompile { .. }));
    }

    #[test]
    fn violation_display_marks_root() {
        let v = SchemaViolation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: "\"type\" is a required property".to_string(),
        };
        assert_eq!(v.to_string(), "(root): \"type\" is a required property");
    }

    #[test]
    fn load_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaResource::load(dir.path(), "0.1.1").unwrap_err();
        assert!(matches!(err, ResourceError::BundleUnavailable { .. }));
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("json-fg").join("0.1.1");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("feature.json"), "{not json").unwrap();
        let err = SchemaResource::load(dir.path(), "0.1.1").unwrap_err();
        assert!(matches!(err, ResourceError::ResourceLoad { ref name, .. } if name == "feature.json"));
    }

    #[test]
    fn load_indexes_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("json-fg").join("0.1.1");
        std::fs::create_dir_all(root.join("sub")).unwrap();
        std::fs::write(root.join("feature.json"), "{}").unwrap();
        std::fs::write(root.join("sub").join("extra.json"), "{}").unwrap();
        std::fs::write(root.join("README.md"), "ignored").unwrap();

        let r = SchemaResource::load(dir.path(), "0.1.1").unwrap();
        assert_eq!(r.names(), vec!["feature.json", "sub/extra.json"]);
        assert_eq!(r.version(), "0.1.1");
        assert_eq!(r.root(), Some(root.as_path()));
    }

    #[test]
    fn resource_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaResource>();
    }
}
