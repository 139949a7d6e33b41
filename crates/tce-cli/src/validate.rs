//! # Validate Subcommand
//!
//! Check an engine file without evaluating anything. Reports every
//! problem, not just the first.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::config::EngineConfig;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also deploy and attach every module, not only check the file.
    #[arg(long)]
    pub build: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config_path: &Path) -> Result<u8> {
    let config = EngineConfig::load(config_path)?;
    let problems = config.problems();

    if !problems.is_empty() {
        eprintln!("  engine: INVALID ({})", config_path.display());
        for p in &problems {
            eprintln!("    - {p}");
        }
        return Ok(1);
    }

    if args.build {
        config.build()?;
    }

    println!("  engine:  VALID ({})", config_path.display());
    println!("  owner:   {}", config.owner);
    println!(
        "  sources: {} credits, {} kyc",
        config.sources.credits.len(),
        config.sources.kyc.len()
    );
    println!("  modules: {}", config.modules.len());
    for m in &config.modules {
        println!("    - {} {} <- {}", m.address(), m.kind_label(), m.source());
    }
    Ok(0)
}
