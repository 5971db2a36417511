//! # credwiz CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credwiz_cli::repair::{run_repair, RepairArgs};
use credwiz_cli::validate::{run_validate, ValidateArgs};
use credwiz_cli::walk::{run_walk, WalkArgs};

/// Credential issuance wizard toolchain.
///
/// Validates credential subject data against its schema, fills in the
/// constants the schema declares, and walks the issuance wizard end to end.
#[derive(Parser, Debug)]
#[command(name = "credwiz", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the wizard configuration file. Overrides CREDWIZ_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate subject data against a subject schema.
    Validate(ValidateArgs),

    /// Fill schema constants into subject data until it validates.
    Repair(RepairArgs),

    /// Walk the issuance wizard with the given data and print each view.
    Walk(WalkArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Repair(args) => run_repair(&args),
        Commands::Walk(args) => {
            credwiz_cli::load_config(cli.config.as_deref()).and_then(|config| run_walk(&args, &config))
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
