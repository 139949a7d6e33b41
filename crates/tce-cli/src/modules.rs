//! # Modules Subcommand
//!
//! List the attached modules in attachment order with their bound
//! configuration.

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;

use tce_core::Address;
use tce_registry::{ComplianceRegistry, ModuleSlot};

use crate::config::EngineConfig;

/// Arguments for the modules subcommand.
#[derive(Args, Debug)]
pub struct ModulesArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// One attached module as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleListing {
    pub slot: Address,
    pub module: Option<&'static str>,
    pub revision: Option<u32>,
    pub source: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_threshold: Option<u128>,
}

impl ModuleListing {
    /// Describe a slot. Fields the bound logic does not expose are `None`.
    pub fn of(slot: &ModuleSlot) -> Self {
        Self {
            slot: slot.address(),
            module: slot.name().ok(),
            revision: slot.revision().ok(),
            source: slot.source_address().ok().flatten(),
            minimum_threshold: slot.minimum_threshold().ok().flatten(),
        }
    }
}

/// Listings of every attached module, in order.
pub fn list_modules(registry: &ComplianceRegistry) -> Result<Vec<ModuleListing>> {
    registry
        .modules()
        .iter()
        .map(|address| {
            let slot = registry
                .slot(address)
                .ok_or_else(|| anyhow!("module {address} vanished from the registry"))?;
            let listing = ModuleListing::of(&slot.read());
            Ok(listing)
        })
        .collect()
}

/// Execute the modules subcommand.
pub fn run_modules(args: &ModulesArgs, config_path: &Path) -> Result<u8> {
    let registry = EngineConfig::load(config_path)?.build()?;
    let listings = list_modules(&registry)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(0);
    }

    println!("  owner:   {}", registry.owner());
    println!("  modules: {}", listings.len());
    for (i, l) in listings.iter().enumerate() {
        let source = l.source.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let threshold = l
            .minimum_threshold
            .map(|t| format!(" threshold={t}"))
            .unwrap_or_default();
        println!(
            "    {i}. {} {} r{} source={source}{threshold}",
            l.slot,
            l.module.unwrap_or("<uninitialized>"),
            l.revision.unwrap_or(0),
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tce_modules::{EngenCreditCheck, KintoKyc};
    use tce_registry::share;
    use tce_sources::SourceDirectory;

    #[test]
    fn test_listing_in_attachment_order() {
        let owner = Address::from_low_u64(0xaa);
        let mut registry = ComplianceRegistry::new(owner, Arc::new(SourceDirectory::new()));
        let kyc = ModuleSlot::deploy(
            Address::from_low_u64(2),
            owner,
            Arc::new(KintoKyc::new()),
            &KintoKyc::init_payload(Address::from_low_u64(0xc1)),
        )
        .unwrap();
        let credit = ModuleSlot::deploy(
            Address::from_low_u64(1),
            owner,
            Arc::new(EngenCreditCheck::new()),
            &EngenCreditCheck::init_payload(Address::from_low_u64(0xc0), 100),
        )
        .unwrap();
        registry.add_module(owner, share(kyc)).unwrap();
        registry.add_module(owner, share(credit)).unwrap();

        let listings = list_modules(&registry).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].module, Some("KintoKYC"));
        assert_eq!(listings[0].minimum_threshold, None);
        assert_eq!(listings[1].module, Some("EngenCreditCheck"));
        assert_eq!(listings[1].minimum_threshold, Some(100));
        assert_eq!(listings[1].source, Some(Address::from_low_u64(0xc0)));
    }

    #[test]
    fn test_listing_of_uninitialized_slot() {
        let slot = ModuleSlot::new(Address::from_low_u64(3), Address::from_low_u64(0xaa));
        let listing = ModuleListing::of(&slot);
        assert_eq!(listing.module, None);
        assert_eq!(listing.revision, None);
        assert_eq!(listing.source, None);
    }
}
