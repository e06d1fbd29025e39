//! # Bundle Sync
//!
//! Fetches the published JSON-FG schema archive and installs it as the
//! local bundle directory that [`crate::SchemaResource::load`] reads.
//!
//! Only `<bundle_dir>/json-fg` is ever replaced; nothing else under the
//! bundle directory is touched. The archive is extracted into a staging
//! directory inside the bundle directory first, and the previous
//! `json-fg` tree is swapped out only after extraction succeeded, so a
//! failed download, open, or extract leaves an existing bundle in place.
//! Entries that would escape the staging directory are rejected by the
//! zip crate's enclosed-name handling.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::config::BundleConfig;

/// Upper bound on the archive size accepted from the network.
pub const MAX_ARCHIVE_BYTES: u64 = 64 * 1024 * 1024;

/// Errors syncing the bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The archive could not be downloaded.
    #[error("download of {url} failed: {reason}")]
    Download {
        /// Archive URL.
        url: String,
        /// Transport error.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("download of {url} failed with HTTP status {status}")]
    HttpStatus {
        /// Archive URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The archive exceeds [`MAX_ARCHIVE_BYTES`].
    #[error("archive exceeds the {limit} byte limit")]
    TooLarge {
        /// Configured limit.
        limit: u64,
    },

    /// The bytes are not a readable zip archive.
    #[error("invalid bundle archive: {0}")]
    Archive(String),

    /// Filesystem error while installing the bundle.
    #[error("io error at {}: {reason}", path.display())]
    Io {
        /// Path being written or removed.
        path: PathBuf,
        /// Underlying error.
        reason: String,
    },
}

/// What a sync installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Bundle directory that was (re)created.
    pub bundle_dir: PathBuf,
    /// Number of archive entries extracted.
    pub entries: usize,
}

/// Download the configured archive and install it.
pub fn sync(config: &BundleConfig) -> Result<SyncSummary, BundleError> {
    tracing::info!(url = %config.bundle_url, "downloading JSON-FG schemas");
    let bytes = download(&config.bundle_url, config)?;
    install(&bytes, &config.bundle_dir)
}

/// Install a local archive instead of downloading one.
pub fn sync_from_archive(config: &BundleConfig, archive: &Path) -> Result<SyncSummary, BundleError> {
    tracing::info!(archive = %archive.display(), "installing JSON-FG schemas from archive");
    let bytes = std::fs::read(archive).map_err(|e| BundleError::Io {
        path: archive.to_path_buf(),
        reason: e.to_string(),
    })?;
    install(&bytes, &config.bundle_dir)
}

/// Fetch the archive bytes, enforcing [`MAX_ARCHIVE_BYTES`].
pub fn download(url: &Url, config: &BundleConfig) -> Result<Vec<u8>, BundleError> {
    let download_err = |reason: String| BundleError::Download {
        url: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| download_err(e.to_string()))?;
    let mut response = client
        .get(url.as_str())
        .send()
        .map_err(|e| download_err(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(BundleError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    if response.content_length().is_some_and(|len| len > MAX_ARCHIVE_BYTES) {
        return Err(BundleError::TooLarge {
            limit: MAX_ARCHIVE_BYTES,
        });
    }

    let mut buf = Vec::new();
    (&mut response)
        .take(MAX_ARCHIVE_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| download_err(e.to_string()))?;
    if buf.len() as u64 > MAX_ARCHIVE_BYTES {
        return Err(BundleError::TooLarge {
            limit: MAX_ARCHIVE_BYTES,
        });
    }
    tracing::debug!(bytes = buf.len(), "archive downloaded");
    Ok(buf)
}

/// Top-level archive directory holding the versioned schemas.
pub const BUNDLE_SUBDIR: &str = "json-fg";

/// Install the zip archive `bytes` as `<bundle_dir>/json-fg`.
pub fn install(bytes: &[u8], bundle_dir: &Path) -> Result<SyncSummary, BundleError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| BundleError::Archive(e.to_string()))?;

    std::fs::create_dir_all(bundle_dir).map_err(io_error(bundle_dir))?;
    let staging = tempfile::Builder::new()
        .prefix(".json-fg-sync-")
        .tempdir_in(bundle_dir)
        .map_err(io_error(bundle_dir))?;

    let entries = archive.len();
    archive
        .extract(staging.path())
        .map_err(|e| BundleError::Archive(e.to_string()))?;

    let staged = staging.path().join(BUNDLE_SUBDIR);
    if !staged.is_dir() {
        return Err(BundleError::Archive(format!(
            "archive has no top-level '{BUNDLE_SUBDIR}' directory"
        )));
    }

    let target = bundle_dir.join(BUNDLE_SUBDIR);
    let retired = staging.path().join("previous");
    if target.exists() {
        tracing::debug!(dir = %target.display(), "retiring previous bundle");
        std::fs::rename(&target, &retired).map_err(io_error(&target))?;
    }
    if let Err(e) = std::fs::rename(&staged, &target) {
        if retired.exists() {
            // Put the previous tree back; the staging dir is dropped either way.
            if let Err(restore) = std::fs::rename(&retired, &target) {
                tracing::error!(dir = %target.display(), error = %restore, "could not restore previous bundle");
            }
        }
        return Err(io_error(&target)(e));
    }

    tracing::info!(dir = %target.display(), entries, "bundle installed");
    Ok(SyncSummary {
        bundle_dir: bundle_dir.to_path_buf(),
        entries,
    })
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> BundleError {
    let path = path.to_path_buf();
    move |e| BundleError::Io {
        path,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in files {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn install_extracts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle");
        let bytes = archive(&[("json-fg/0.1.1/feature.json", "{}")]);

        let summary = install(&bytes, &target).unwrap();
        assert_eq!(summary.entries, 1);
        assert!(target.join("json-fg/0.1.1/feature.json").is_file());
    }

    #[test]
    fn install_replaces_only_the_schema_tree() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle");
        std::fs::create_dir_all(target.join("json-fg/0.1.0")).unwrap();
        std::fs::write(target.join("json-fg/0.1.0/stale.json"), "{}").unwrap();
        std::fs::write(target.join("thesis.tex"), "keep me").unwrap();

        install(&archive(&[("json-fg/0.1.1/feature.json", "{}")]), &target).unwrap();
        assert!(!target.join("json-fg/0.1.0").exists());
        assert!(target.join("json-fg/0.1.1/feature.json").is_file());
        assert_eq!(std::fs::read_to_string(target.join("thesis.tex")).unwrap(), "keep me");

        let leftovers: Vec<_> = std::fs::read_dir(&target)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 2, "staging directory left behind: {leftovers:?}");
    }

    #[test]
    fn failed_extract_keeps_previous_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle");
        std::fs::create_dir_all(target.join("json-fg/0.1.1")).unwrap();
        std::fs::write(target.join("json-fg/0.1.1/feature.json"), "{}").unwrap();

        let escaping = archive(&[("json-fg/0.1.1/new.json", "{}"), ("../escape.json", "{}")]);
        let err = install(&escaping, &target).unwrap_err();
        assert!(matches!(err, BundleError::Archive(_)));
        assert!(target.join("json-fg/0.1.1/feature.json").is_file());
        assert!(!target.join("json-fg/0.1.1/new.json").exists());
        assert!(!dir.path().join("escape.json").exists());
    }

    #[test]
    fn archive_without_schema_tree_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle");
        std::fs::create_dir_all(target.join("json-fg")).unwrap();
        std::fs::write(target.join("json-fg/keep.json"), "{}").unwrap();

        let err = install(&archive(&[("other/feature.json", "{}")]), &target).unwrap_err();
        assert!(matches!(err, BundleError::Archive(ref m) if m.contains("json-fg")));
        assert!(target.join("json-fg/keep.json").is_file());
    }

    #[test]
    fn invalid_archive_leaves_previous_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bundle");
        std::fs::create_dir_all(target.join("json-fg")).unwrap();
        std::fs::write(target.join("json-fg/keep.json"), "{}").unwrap();

        let err = install(b"not a zip", &target).unwrap_err();
        assert!(matches!(err, BundleError::Archive(_)));
        assert!(target.join("json-fg/keep.json").exists());
    }

    #[test]
    fn sync_from_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let config = BundleConfig::at(dir.path().join("bundle")).unwrap();
        let err = sync_from_archive(&config, &dir.path().join("absent.zip")).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
