//! # KYC Check Module
//!
//! Requires the transfer's parties to be verified in the bound Kinto KYC
//! registry. Which parties are checked is a property of the logic, not of
//! the configuration: moving from sender-only to sender-and-recipient
//! screening is a logic upgrade that leaves the registry address alone.
//!
//! ## Storage
//!
//! | position | field | kind |
//! |---|---|---|
//! | 0 | `source_address` | address |
//!
//! An unverified party is a plain `Ok(false)`. Missing configuration or an
//! unreachable registry is a fail-closed `Rejection`.

use serde::{Deserialize, Serialize};

use tce_core::{Address, TransferCheckRequest};
use tce_sources::SourceDirectory;

use crate::error::Rejection;
use crate::module::{InitPayload, RuleModule};
use crate::storage::{ConfigField, FieldSlot, ModuleStorage, StorageLayout, WordKind};

/// Storage position of the KYC registry address.
pub const REGISTRY_ADDRESS: FieldSlot =
    FieldSlot::new(0, ConfigField::SourceAddress, WordKind::Address);

const FIELDS: &[FieldSlot] = &[REGISTRY_ADDRESS];

static LAYOUT: StorageLayout = StorageLayout::new(FIELDS);

/// Which transfer parties must be KYC-verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycPolicy {
    /// Only the sender.
    #[default]
    Sender,
    /// Only the recipient.
    Recipient,
    /// Both sender and recipient.
    SenderAndRecipient,
}

impl KycPolicy {
    fn parties(self, request: &TransferCheckRequest) -> Vec<Address> {
        match self {
            Self::Sender => vec![request.sender],
            Self::Recipient => vec![request.recipient],
            Self::SenderAndRecipient => vec![request.sender, request.recipient],
        }
    }
}

impl std::fmt::Display for KycPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sender => f.write_str("sender"),
            Self::Recipient => f.write_str("recipient"),
            Self::SenderAndRecipient => f.write_str("sender_and_recipient"),
        }
    }
}

/// KYC verification check against a Kinto KYC registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct KintoKyc {
    policy: KycPolicy,
}

impl KintoKyc {
    /// The module's fixed identifier.
    pub const NAME: &'static str = "KintoKYC";

    /// Sender-only screening.
    pub fn new() -> Self {
        Self::default()
    }

    /// Screening under an explicit policy.
    pub fn with_policy(policy: KycPolicy) -> Self {
        Self { policy }
    }

    /// The parties this logic screens.
    pub fn policy(&self) -> KycPolicy {
        self.policy
    }

    /// Constructor argument: the KYC registry address.
    pub fn init_payload(kyc_registry: Address) -> InitPayload {
        InitPayload::new().source_address(kyc_registry)
    }
}

impl RuleModule for KintoKyc {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    // Sender-only shipped first as revision 1.
    fn revision(&self) -> u32 {
        match self.policy {
            KycPolicy::Sender => 1,
            KycPolicy::Recipient | KycPolicy::SenderAndRecipient => 2,
        }
    }

    fn layout(&self) -> &'static StorageLayout {
        &LAYOUT
    }

    fn check(
        &self,
        storage: &ModuleStorage,
        sources: &SourceDirectory,
        request: &TransferCheckRequest,
    ) -> Result<bool, Rejection> {
        let registry_address = storage
            .read_address(&REGISTRY_ADDRESS)
            .map_err(|source| Rejection::CorruptStorage {
                module: Self::NAME,
                source,
            })?
            .ok_or(Rejection::SourceUnset { module: Self::NAME })?;

        let unavailable = |source| Rejection::SourceUnavailable {
            module: Self::NAME,
            source,
        };
        let registry = sources.kyc(&registry_address).map_err(unavailable)?;

        for party in self.policy.parties(request) {
            if !registry.is_verified(&party).map_err(unavailable)? {
                tracing::debug!(
                    module = Self::NAME,
                    %party,
                    policy = %self.policy,
                    "party not KYC-verified"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
