//! Logging options shared by every subcommand.
//!
//! `--verbosity` picks the level, `--log` sends records to a file instead
//! of stderr. With neither option the tool stays silent unless `RUST_LOG`
//! is set. A log file alone implies `INFO`.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::{Args, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Log level names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Verbosity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl Verbosity {
    /// `tracing` filter directive for this level. `CRITICAL` has no
    /// counterpart and maps to `error`.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Critical | Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Log level.
    #[arg(short = 'v', long, value_enum, ignore_case = true)]
    pub verbosity: Option<Verbosity>,

    /// Write log records to this file.
    #[arg(short = 'l', long = "log", value_name = "FILE")]
    pub logfile: Option<PathBuf>,
}

impl LogArgs {
    /// Filter directive to install, or `None` when logging stays off.
    pub fn directive(&self) -> Option<&'static str> {
        match (self.verbosity, &self.logfile) {
            (Some(level), _) => Some(level.directive()),
            (None, Some(_)) => Some(Verbosity::Info.directive()),
            (None, None) => None,
        }
    }
}

/// Install the global subscriber described by `args`.
pub fn init(args: &LogArgs) -> anyhow::Result<()> {
    let filter = match args.directive() {
        Some(directive) => EnvFilter::new(directive),
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => return Ok(()),
        },
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = match &args.logfile {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("cannot install logger: {e}"))
}
