//! `bundle sync`: replace the local schema bundle with a fresh copy.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use jfg_schema::{bundle, BundleConfig};

use crate::logging::LogArgs;

/// Arguments for `bundle sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Install from a local archive instead of downloading.
    #[arg(long, value_name = "ZIP")]
    pub archive: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Execute `bundle sync`.
pub fn run_sync(args: &SyncArgs, config: &BundleConfig, out: &mut impl Write) -> anyhow::Result<u8> {
    let summary = match &args.archive {
        Some(archive) => bundle::sync_from_archive(config, archive),
        None => bundle::sync(config),
    }
    .context("bundle sync failed")?;

    writeln!(
        out,
        "JSON-FG schemas cached in {} ({} entries)",
        summary.bundle_dir.display(),
        summary.entries
    )
    .context("cannot write output")?;
    Ok(0)
}
