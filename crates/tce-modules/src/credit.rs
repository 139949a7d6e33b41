//! # Credit Check Module
//!
//! Requires the sender to hold at least a configured number of Engen
//! credits in the bound credits ledger.
//!
//! ## Storage
//!
//! | position | field | kind |
//! |---|---|---|
//! | 0 | `source_address` | address |
//! | 1 | `minimum_threshold` | uint |
//!
//! ## Evaluation
//!
//! 1. Unset source address → `SourceUnset`.
//! 2. Unset threshold → `ConfigurationUnset`.
//! 3. Ledger not resolvable or not answering → `SourceUnavailable`.
//! 4. `credits(sender) >= threshold` → approve.
//! 5. Otherwise → `NotEnoughCredits`.
//!
//! Recipient, amount and aux data are not evaluated. A threshold of zero
//! approves every sender once the ledger answers.

use tce_core::{Address, TransferCheckRequest};
use tce_sources::SourceDirectory;

use crate::error::Rejection;
use crate::module::{InitPayload, RuleModule};
use crate::storage::{ConfigField, FieldSlot, ModuleStorage, StorageLayout, WordKind};

/// Storage position of the credits ledger address.
pub const SOURCE_ADDRESS: FieldSlot =
    FieldSlot::new(0, ConfigField::SourceAddress, WordKind::Address);

/// Storage position of the minimum credit requirement.
pub const MINIMUM_THRESHOLD: FieldSlot =
    FieldSlot::new(1, ConfigField::MinimumThreshold, WordKind::Uint);

const FIELDS: &[FieldSlot] = &[SOURCE_ADDRESS, MINIMUM_THRESHOLD];

static LAYOUT: StorageLayout = StorageLayout::new(FIELDS);

/// Minimum Engen credit balance check on the sender.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngenCreditCheck;

impl EngenCreditCheck {
    /// The module's fixed identifier.
    pub const NAME: &'static str = "EngenCreditCheck";

    /// Create the logic.
    pub fn new() -> Self {
        Self
    }

    /// Constructor arguments: credits ledger address and minimum credits.
    pub fn init_payload(credits_source: Address, minimum_credits: u128) -> InitPayload {
        InitPayload::new()
            .source_address(credits_source)
            .minimum_threshold(minimum_credits)
    }
}

impl RuleModule for EngenCreditCheck {
    fn name(&self) -> &'static str {
        Self::NAME
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
        let corrupt = |source| Rejection::CorruptStorage {
            module: Self::NAME,
            source,
        };

        let source_address = storage
            .read_address(&SOURCE_ADDRESS)
            .map_err(corrupt)?
            .ok_or(Rejection::SourceUnset { module: Self::NAME })?;

        let required = storage
            .read_uint(&MINIMUM_THRESHOLD)
            .map_err(corrupt)?
            .ok_or(Rejection::ConfigurationUnset {
                module: Self::NAME,
                field: ConfigField::MinimumThreshold,
            })?;

        let unavailable = |source| Rejection::SourceUnavailable {
            module: Self::NAME,
            source,
        };
        let ledger = sources.credits(&source_address).map_err(unavailable)?;
        let available = ledger.credits_of(&request.sender).map_err(unavailable)?;

        if available >= required {
            Ok(true)
        } else {
            tracing::debug!(
                module = Self::NAME,
                sender = %request.sender,
                available,
                required,
                "insufficient credits"
            );
            Err(Rejection::NotEnoughCredits {
                available,
                required,
            })
        }
    }
}
