//! # tce CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tce_cli::check::{run_check, CheckArgs};
use tce_cli::modules::{run_modules, ModulesArgs};
use tce_cli::validate::{run_validate, ValidateArgs};

/// Transfer compliance engine.
///
/// Loads a registry of rule modules from a YAML engine file and decides
/// whether candidate transfers may proceed.
#[derive(Parser, Debug)]
#[command(name = "tce", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the engine file.
    #[arg(long, global = true, default_value = "engine.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the engine file.
    Validate(ValidateArgs),

    /// List attached modules in attachment order.
    Modules(ModulesArgs),

    /// Decide whether a transfer may proceed.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
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

    tracing::debug!(config = %cli.config.display(), "tce starting");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &cli.config),
        Commands::Modules(args) => run_modules(args, &cli.config),
        Commands::Check(args) => run_check(args, &cli.config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "tce",
            "check",
            "--from",
            "0x00000000000000000000000000000000000a11ce",
            "--to",
            "0x0000000000000000000000000000000000000b0b",
            "--amount",
            "10",
        ])
        .unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.amount, 10);
                assert!(args.aux.is_empty());
                assert!(!args.json);
            }
            other => panic!("Expected check, got: {other:?}"),
        }
        assert_eq!(cli.config, PathBuf::from("engine.yaml"));
    }

    #[test]
    fn cli_parse_rejects_malformed_address() {
        let result = Cli::try_parse_from([
            "tce", "check", "--from", "0x1234", "--to", "0x1234", "--amount", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tce",
            "modules",
            "--json",
            "-vv",
            "--config",
            "other.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("other.yaml"));
        assert!(matches!(cli.command, Commands::Modules(ModulesArgs { json: true })));
    }

    #[test]
    fn cli_parse_validate_build() {
        let cli = Cli::try_parse_from(["tce", "validate", "--build"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate(ValidateArgs { build: true })));
    }
}
