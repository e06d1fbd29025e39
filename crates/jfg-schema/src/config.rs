//! Bundle configuration.
//!
//! Locates the on-disk schema bundle and the archive it is synced from.
//! Defaults match the published JSON-FG 0.1.1 schemas. Override via
//! environment variables or explicit construction for testing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

/// Default archive published by OGC for JSON-FG 0.1.1.
pub const DEFAULT_BUNDLE_URL: &str = "https://beta.schemas.opengis.net/json-fg/json-fg-0_1_1.zip";

/// Default schema version directory inside the bundle.
pub const DEFAULT_SCHEMA_VERSION: &str = "0.1.1";

/// Name of the bundle directory under the user's home.
pub const DEFAULT_HOME_DIR_NAME: &str = ".json-fg-validator";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the schema bundle lives and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Root of the local bundle. Schemas live under
    /// `<bundle_dir>/json-fg/<schema_version>/`.
    pub bundle_dir: PathBuf,
    /// Archive downloaded by `bundle sync`.
    pub bundle_url: Url,
    /// Version directory to load schemas from.
    pub schema_version: String,
    /// Request timeout for the archive download.
    pub timeout: Duration,
}

impl BundleConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `JSON_FG_VALIDATOR_HOME` (default: `$HOME/.json-fg-validator`)
    /// - `JSON_FG_BUNDLE_URL` (default: [`DEFAULT_BUNDLE_URL`])
    /// - `JSON_FG_SCHEMA_VERSION` (default: `0.1.1`)
    /// - `JSON_FG_HTTP_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bundle_dir = match lookup("JSON_FG_VALIDATOR_HOME") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDirectory)?
                .join(DEFAULT_HOME_DIR_NAME),
        };

        let raw_url = lookup("JSON_FG_BUNDLE_URL").unwrap_or_else(|| DEFAULT_BUNDLE_URL.to_string());
        let bundle_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("JSON_FG_BUNDLE_URL".to_string(), e.to_string()))?;

        let schema_version = lookup("JSON_FG_SCHEMA_VERSION")
            .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_string());
        if schema_version.is_empty() || schema_version.contains(['/', '\\']) || schema_version == ".." {
            return Err(ConfigError::InvalidValue(
                "JSON_FG_SCHEMA_VERSION".to_string(),
                schema_version,
            ));
        }

        let timeout_secs = match lookup("JSON_FG_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue("JSON_FG_HTTP_TIMEOUT_SECS".to_string(), raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            bundle_dir,
            bundle_url,
            schema_version,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Configuration rooted at an explicit directory (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the default URL cannot be parsed.
    pub fn at(bundle_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self {
            bundle_dir: bundle_dir.as_ref().to_path_buf(),
            bundle_url: Url::parse(DEFAULT_BUNDLE_URL)
                .map_err(|e| ConfigError::InvalidUrl("default".to_string(), e.to_string()))?,
            schema_version: DEFAULT_SCHEMA_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Directory holding the schemas of the configured version.
    pub fn schema_dir(&self) -> PathBuf {
        self.bundle_dir.join("json-fg").join(&self.schema_version)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot determine the home directory; set JSON_FG_VALIDATOR_HOME")]
    NoHomeDirectory,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}
