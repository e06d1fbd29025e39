//! # json-fg-validator entry point
//!
//! Parses arguments, installs logging, and dispatches to the handlers in
//! the library crate.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jfg_cli::bundle::{run_sync, SyncArgs};
use jfg_cli::logging::{self, LogArgs};
use jfg_cli::validate::{run_validate, ValidateArgs, EXIT_INCOMPLETE};
use jfg_schema::BundleConfig;

/// Validator for OGC Features and Geometries JSON (JSON-FG) documents.
#[derive(Parser, Debug)]
#[command(name = "json-fg-validator", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Executable test suite.
    Ets {
        #[command(subcommand)]
        command: EtsCommand,
    },
    /// Schema bundle management.
    Bundle {
        #[command(subcommand)]
        command: BundleCommand,
    },
}

#[derive(Subcommand, Debug)]
enum EtsCommand {
    /// Validate a JSON-FG document.
    Validate(ValidateArgs),
}

#[derive(Subcommand, Debug)]
enum BundleCommand {
    /// Download and cache the JSON-FG schemas.
    Sync(SyncArgs),
}

impl Commands {
    fn log_args(&self) -> &LogArgs {
        match self {
            Self::Ets {
                command: EtsCommand::Validate(args),
            } => &args.log,
            Self::Bundle {
                command: BundleCommand::Sync(args),
            } => &args.log,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.command.log_args()) {
        eprintln!("error: {e:#}");
        return ExitCode::from(EXIT_INCOMPLETE);
    }

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_INCOMPLETE)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = BundleConfig::from_env().context("invalid configuration")?;
    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Ets {
            command: EtsCommand::Validate(args),
        } => run_validate(args, &config, &mut stdout),
        Commands::Bundle {
            command: BundleCommand::Sync(args),
        } => run_sync(args, &config, &mut stdout),
    }
}
