//! # Engine Configuration
//!
//! The YAML file the `tce` binary runs against: the registry owner, the
//! credential sources to stand up in memory, and the ordered module list.
//!
//! ```yaml
//! owner: "0x00000000000000000000000000000000000000aa"
//! sources:
//!   credits:
//!     - address: "0x00000000000000000000000000000000000000c0"
//!       balances:
//!         "0x00000000000000000000000000000000000a11ce": 150
//!   kyc:
//!     - address: "0x00000000000000000000000000000000000000c1"
//!       verified: ["0x00000000000000000000000000000000000a11ce"]
//! modules:
//!   - kind: engen_credit_check
//!     address: "0x0000000000000000000000000000000000000001"
//!     source: "0x00000000000000000000000000000000000000c0"
//!     threshold: 100
//!   - kind: kinto_kyc
//!     address: "0x0000000000000000000000000000000000000002"
//!     source: "0x00000000000000000000000000000000000000c1"
//!     policy: sender
//! ```
//!
//! Every module is deployed and owned by `owner`, and attached in file
//! order. Validation names the offending entry (`modules[1]`, ...).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use tce_core::Address;
use tce_modules::{EngenCreditCheck, KintoKyc, KycPolicy};
use tce_registry::{share, ComplianceRegistry, ModuleSlot, SlotError};
use tce_sources::{InMemoryCredits, InMemoryKyc, SourceDirectory, SourceKind};

/// Top-level engine file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Owner of the registry and of every deployed slot.
    pub owner: Address,
    /// In-memory credential sources.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Modules in attachment order.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// Credential sources, by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    #[serde(default)]
    pub credits: Vec<CreditsSourceConfig>,
    #[serde(default)]
    pub kyc: Vec<KycSourceConfig>,
}

/// A credits ledger and its balances. Unlisted identities hold zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreditsSourceConfig {
    pub address: Address,
    #[serde(default)]
    pub balances: BTreeMap<Address, u64>,
}

/// A KYC registry and its verified identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KycSourceConfig {
    pub address: Address,
    #[serde(default)]
    pub verified: Vec<Address>,
}

/// One module to deploy and attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModuleConfig {
    /// Sender credit balance must reach `threshold`.
    #[serde(rename = "engen_credit_check")]
    CreditCheck {
        address: Address,
        source: Address,
        threshold: u64,
    },
    /// Parties must be verified in the KYC registry at `source`.
    #[serde(rename = "kinto_kyc")]
    Kyc {
        address: Address,
        source: Address,
        #[serde(default)]
        policy: KycPolicy,
    },
}

impl ModuleConfig {
    /// The slot address.
    pub fn address(&self) -> Address {
        match self {
            Self::CreditCheck { address, .. } | Self::Kyc { address, .. } => *address,
        }
    }

    /// The source the module is bound to.
    pub fn source(&self) -> Address {
        match self {
            Self::CreditCheck { source, .. } | Self::Kyc { source, .. } => *source,
        }
    }

    /// The `kind` tag as written in the file.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::CreditCheck { .. } => "engen_credit_check",
            Self::Kyc { .. } => "kinto_kyc",
        }
    }

    /// The source kind this module resolves its source as.
    pub fn expected_source(&self) -> SourceKind {
        match self {
            Self::CreditCheck { .. } => SourceKind::Credits,
            Self::Kyc { .. } => SourceKind::Kyc,
        }
    }

    /// Deploy an initialized slot for this module, owned by `owner`.
    pub fn deploy(&self, owner: Address) -> Result<ModuleSlot, SlotError> {
        match self {
            Self::CreditCheck {
                address,
                source,
                threshold,
            } => ModuleSlot::deploy(
                *address,
                owner,
                Arc::new(EngenCreditCheck::new()),
                &EngenCreditCheck::init_payload(*source, u128::from(*threshold)),
            ),
            Self::Kyc {
                address,
                source,
                policy,
            } => ModuleSlot::deploy(
                *address,
                owner,
                Arc::new(KintoKyc::with_policy(*policy)),
                &KintoKyc::init_payload(*source),
            ),
        }
    }
}

impl EngineConfig {
    /// Parse an engine file from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("parsing engine YAML")
    }

    /// Read and parse an engine file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine file: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("loading engine file: {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            modules = config.modules.len(),
            "engine file loaded"
        );
        Ok(config)
    }

    /// Every problem that would prevent building the engine. Empty when
    /// the file is valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.owner.is_zero() {
            problems.push("owner: must not be the zero address".to_string());
        }

        let mut declared: HashMap<Address, SourceKind> = HashMap::new();
        let entries = self
            .sources
            .credits
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("sources.credits[{i}]"), c.address, SourceKind::Credits))
            .chain(
                self.sources
                    .kyc
                    .iter()
                    .enumerate()
                    .map(|(i, k)| (format!("sources.kyc[{i}]"), k.address, SourceKind::Kyc)),
            );
        for (label, address, kind) in entries {
            if address.is_zero() {
                problems.push(format!("{label}: address must not be the zero address"));
            } else if declared.insert(address, kind).is_some() {
                problems.push(format!("{label}: source {address} is declared more than once"));
            }
        }

        let mut slots = HashSet::new();
        for (i, module) in self.modules.iter().enumerate() {
            let label = format!("modules[{i}] ({})", module.kind_label());
            let address = module.address();
            if address.is_zero() {
                problems.push(format!("{label}: address must not be the zero address"));
            } else if !slots.insert(address) {
                problems.push(format!("{label}: slot {address} is listed more than once"));
            }

            let source = module.source();
            let expected = module.expected_source();
            match declared.get(&source) {
                _ if source.is_zero() => {
                    problems.push(format!("{label}: source must not be the zero address"));
                }
                None => problems.push(format!(
                    "{label}: source {source} is not a declared {expected} source"
                )),
                Some(actual) if *actual != expected => problems.push(format!(
                    "{label}: source {source} is a {actual} source, {expected} expected"
                )),
                Some(_) => {}
            }
        }

        problems
    }

    /// Stand up the sources, deploy every module, and attach them in
    /// file order.
    pub fn build(&self) -> Result<ComplianceRegistry> {
        let problems = self.problems();
        if !problems.is_empty() {
            bail!("invalid engine configuration: {}", problems.join("; "));
        }

        let directory = Arc::new(SourceDirectory::new());
        for (i, credits) in self.sources.credits.iter().enumerate() {
            let ledger = InMemoryCredits::with_balances(
                credits.balances.iter().map(|(holder, amount)| (*holder, u128::from(*amount))),
            );
            directory
                .register_credits(credits.address, Arc::new(ledger))
                .with_context(|| format!("sources.credits[{i}]"))?;
        }
        for (i, kyc) in self.sources.kyc.iter().enumerate() {
            let registry = InMemoryKyc::with_verified(kyc.verified.iter().copied());
            directory
                .register_kyc(kyc.address, Arc::new(registry))
                .with_context(|| format!("sources.kyc[{i}]"))?;
        }

        let mut registry = ComplianceRegistry::new(self.owner, directory);
        for (i, module) in self.modules.iter().enumerate() {
            let slot = module
                .deploy(self.owner)
                .with_context(|| format!("modules[{i}]: deploying {}", module.kind_label()))?;
            registry
                .add_module(self.owner, share(slot))
                .with_context(|| format!("modules[{i}]: attaching {}", module.kind_label()))?;
        }

        tracing::info!(owner = %self.owner, modules = registry.len(), "engine built");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tce_core::TransferCheckRequest;

    const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
    const BOB: &str = "0x0000000000000000000000000000000000000b0b";

    const ENGINE_YAML: &str = r#"
owner: "0x00000000000000000000000000000000000000aa"
sources:
  credits:
    - address: "0x00000000000000000000000000000000000000c0"
      balances:
        "0x00000000000000000000000000000000000a11ce": 150
        "0x0000000000000000000000000000000000000b0b": 50
  kyc:
    - address: "0x00000000000000000000000000000000000000c1"
      verified: ["0x00000000000000000000000000000000000a11ce"]
modules:
  - kind: engen_credit_check
    address: "0x0000000000000000000000000000000000000001"
    source: "0x00000000000000000000000000000000000000c0"
    threshold: 100
  - kind: kinto_kyc
    address: "0x0000000000000000000000000000000000000002"
    source: "0x00000000000000000000000000000000000000c1"
"#;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn config() -> EngineConfig {
        EngineConfig::from_yaml_str(ENGINE_YAML).unwrap()
    }

    // ── Parsing ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_engine_file() {
        let config = config();
        assert_eq!(config.owner, Address::from_low_u64(0xaa));
        assert_eq!(config.sources.credits[0].balances[&addr(ALICE)], 150);
        assert_eq!(config.modules.len(), 2);
        assert_eq!(
            config.modules[0],
            ModuleConfig::CreditCheck {
                address: Address::from_low_u64(1),
                source: Address::from_low_u64(0xc0),
                threshold: 100,
            }
        );
    }

    #[test]
    fn test_kyc_policy_defaults_to_sender() {
        match &config().modules[1] {
            ModuleConfig::Kyc { policy, .. } => assert_eq!(*policy, KycPolicy::Sender),
            other => panic!("Expected kinto_kyc module, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_module_kind_is_a_parse_error() {
        let yaml = r#"
owner: "0x00000000000000000000000000000000000000aa"
modules:
  - kind: sanctions_screen
    address: "0x0000000000000000000000000000000000000001"
    source: "0x00000000000000000000000000000000000000c0"
"#;
        assert!(EngineConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_malformed_address_is_a_parse_error() {
        assert!(EngineConfig::from_yaml_str("owner: \"0xabc\"\n").is_err());
    }

    #[test]
    fn test_minimal_file_has_no_modules() {
        let yaml = "owner: \"0x00000000000000000000000000000000000000aa\"\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert!(config.modules.is_empty());
        assert!(config.problems().is_empty());
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn test_valid_file_has_no_problems() {
        assert_eq!(config().problems(), Vec::<String>::new());
    }

    #[test]
    fn test_zero_owner_is_reported() {
        let mut config = config();
        config.owner = Address::ZERO;
        assert!(config.problems().iter().any(|p| p.starts_with("owner:")));
    }

    #[test]
    fn test_undeclared_source_is_reported() {
        let mut config = config();
        config.sources.kyc.clear();
        let problems = config.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("modules[1] (kinto_kyc)"), "{problems:?}");
    }

    #[test]
    fn test_wrong_source_kind_is_reported() {
        let mut config = config();
        config.modules[0] = ModuleConfig::CreditCheck {
            address: Address::from_low_u64(1),
            source: Address::from_low_u64(0xc1),
            threshold: 1,
        };
        let problems = config.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("is a kyc source, credits expected"), "{problems:?}");
    }

    #[test]
    fn test_duplicate_slot_is_reported() {
        let mut config = config();
        let first = config.modules[0].clone();
        config.modules.push(first);
        let problems = config.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("modules[2]"), "{problems:?}");
    }

    #[test]
    fn test_duplicate_source_is_reported() {
        let mut config = config();
        config.sources.kyc[0].address = Address::from_low_u64(0xc0);
        assert!(config
            .problems()
            .iter()
            .any(|p| p.starts_with("sources.kyc[0]") && p.contains("more than once")));
    }

    // ── Building ─────────────────────────────────────────────────────

    #[test]
    fn test_build_attaches_modules_in_file_order() {
        let registry = config().build().unwrap();
        assert_eq!(
            registry.modules(),
            vec![Address::from_low_u64(1), Address::from_low_u64(2)]
        );
        assert_eq!(registry.owner(), Address::from_low_u64(0xaa));
    }

    #[test]
    fn test_built_engine_decides_transfers() {
        let registry = config().build().unwrap();
        assert!(registry.module_check(&TransferCheckRequest::new(addr(ALICE), addr(BOB), 10)));
        // Bob holds 50 credits and is not verified.
        assert!(!registry.module_check(&TransferCheckRequest::new(addr(BOB), addr(ALICE), 10)));
    }

    #[test]
    fn test_build_refuses_invalid_file() {
        let mut config = config();
        config.sources.credits.clear();
        let err = config.build().unwrap_err();
        assert!(err.to_string().contains("modules[0]"), "{err}");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yaml");
        std::fs::write(&path, ENGINE_YAML).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config());
    }

    #[test]
    fn test_load_missing_file_names_the_path() {
        let err = EngineConfig::load(Path::new("/nonexistent/engine.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/engine.yaml"));
    }
}
