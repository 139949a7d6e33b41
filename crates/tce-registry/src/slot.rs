//! # Upgradeable Module Slot
//!
//! A [`ModuleSlot`] is the stable identity a registry attaches. It holds
//! two things: a reference to the current [`RuleModule`] logic, and the
//! [`ModuleStorage`] that logic runs against. Every call the slot does
//! not handle itself is dispatched to the logic with the slot's storage,
//! so the configuration belongs to the slot and survives logic swaps.
//!
//! ## Lifecycle
//!
//! ```text
//! new ──▶ Uninitialized ──initialize(logic, payload)──▶ Initialized
//!                                                         │   ▲
//!                                                         └───┘ upgrade_to(logic)
//! ```
//!
//! `initialize` runs once per slot lifetime. Not even the owner can run
//! it again; later configuration goes through the owner-gated `update_*`
//! calls.
//!
//! ## Atomicity
//!
//! Mutating calls run the logic on a scratch copy of the storage and
//! commit it only if the whole call succeeded. A refused call leaves the
//! slot exactly as it was.

use std::sync::Arc;

use tce_core::{Address, Ownership, Timestamp, TransferCheckRequest};
use tce_modules::{ConfigField, InitPayload, ModuleStorage, Rejection, RuleModule, StorageWord};
use tce_sources::SourceDirectory;

use crate::error::SlotError;

/// Whether the one-shot initialization has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitState {
    /// No logic bound; checks fail closed.
    Uninitialized,
    /// Logic bound and constructor payload applied.
    Initialized,
}

impl std::fmt::Display for InitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("UNINITIALIZED"),
            Self::Initialized => f.write_str("INITIALIZED"),
        }
    }
}

/// One logic installation in a slot's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicRevision {
    /// Module name of the installed logic.
    pub module: &'static str,
    /// Its revision number.
    pub revision: u32,
    /// When it was installed.
    pub installed_at: Timestamp,
}

/// A stable, storage-owning handle around swappable rule logic.
#[derive(Debug)]
pub struct ModuleSlot {
    address: Address,
    ownership: Ownership,
    state: InitState,
    logic: Option<Arc<dyn RuleModule>>,
    storage: ModuleStorage,
    revisions: Vec<LogicRevision>,
}

impl ModuleSlot {
    /// An uninitialized slot at `address`, owned by `owner`.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            ownership: Ownership::new(owner),
            state: InitState::Uninitialized,
            logic: None,
            storage: ModuleStorage::new(),
            revisions: Vec::new(),
        }
    }

    /// Create a slot and initialize it in one step, the way a proxy is
    /// constructed with its logic and encoded initializer call.
    pub fn deploy(
        address: Address,
        owner: Address,
        logic: Arc<dyn RuleModule>,
        payload: &InitPayload,
    ) -> Result<Self, SlotError> {
        let mut slot = Self::new(address, owner);
        slot.initialize(owner, logic, payload)?;
        Ok(slot)
    }

    // ── Intercepted calls ────────────────────────────────────────────

    /// Bind `logic` and apply its constructor payload. Owner-gated, once.
    pub fn initialize(
        &mut self,
        caller: Address,
        logic: Arc<dyn RuleModule>,
        payload: &InitPayload,
    ) -> Result<(), SlotError> {
        self.ownership.authorize(caller, "initialize module")?;
        if self.state == InitState::Initialized {
            return Err(SlotError::AlreadyInitialized { slot: self.address });
        }

        let mut staged = self.storage.clone();
        logic.initialize(&mut staged, payload)?;

        self.storage = staged;
        self.state = InitState::Initialized;
        self.record_revision(logic.as_ref());
        tracing::info!(
            slot = %self.address,
            module = logic.name(),
            revision = logic.revision(),
            "module slot initialized"
        );
        self.logic = Some(logic);
        Ok(())
    }

    /// Replace the logic, keeping storage. Owner-gated.
    ///
    /// The new logic's layout must keep every existing field where it is.
    pub fn upgrade_to(
        &mut self,
        caller: Address,
        logic: Arc<dyn RuleModule>,
    ) -> Result<(), SlotError> {
        self.ownership.authorize(caller, "upgrade module")?;
        let current = self.bound_logic()?;

        current
            .layout()
            .check_upgrade(logic.layout())
            .map_err(|source| SlotError::IncompatibleUpgrade {
                slot: self.address,
                from: current.name(),
                to: logic.name(),
                source,
            })?;

        tracing::info!(
            slot = %self.address,
            from = current.name(),
            from_revision = current.revision(),
            to = logic.name(),
            to_revision = logic.revision(),
            "module logic upgraded"
        );
        self.record_revision(logic.as_ref());
        self.logic = Some(logic);
        Ok(())
    }

    /// Hand the slot to a new owner. Owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), SlotError> {
        self.ownership.transfer(caller, new_owner)?;
        Ok(())
    }

    /// The slot's stable address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The slot owner.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Initialization state.
    pub fn init_state(&self) -> InitState {
        self.state
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.state == InitState::Initialized
    }

    /// Every logic installed in this slot, oldest first.
    pub fn revisions(&self) -> &[LogicRevision] {
        &self.revisions
    }

    /// Read-only view of the slot's storage.
    pub fn storage(&self) -> &ModuleStorage {
        &self.storage
    }

    // ── Forwarded calls ──────────────────────────────────────────────

    /// The current logic's fixed name.
    pub fn name(&self) -> Result<&'static str, SlotError> {
        Ok(self.bound_logic()?.name())
    }

    /// The current logic's revision.
    pub fn revision(&self) -> Result<u32, SlotError> {
        Ok(self.bound_logic()?.revision())
    }

    /// Run the current logic's check against this slot's storage.
    ///
    /// Standalone form: rule violations surface as a typed [`Rejection`].
    /// An uninitialized slot fails closed.
    pub fn check(
        &self,
        sources: &SourceDirectory,
        request: &TransferCheckRequest,
    ) -> Result<bool, Rejection> {
        match &self.logic {
            Some(logic) => logic.check(&self.storage, sources, request),
            None => Err(Rejection::Uninitialized { slot: self.address }),
        }
    }

    /// Overwrite one configuration field. Owner-gated, idempotent.
    pub fn update(
        &mut self,
        caller: Address,
        field: ConfigField,
        value: StorageWord,
    ) -> Result<(), SlotError> {
        self.ownership.authorize(caller, "update module configuration")?;
        let logic = self.bound_logic()?;

        let mut staged = self.storage.clone();
        logic.update(&mut staged, field, value)?;
        self.storage = staged;

        tracing::info!(
            slot = %self.address,
            module = logic.name(),
            %field,
            %value,
            "module configuration updated"
        );
        Ok(())
    }

    /// Rebind the module to another external source. Owner-gated.
    pub fn update_source_address(
        &mut self,
        caller: Address,
        address: Address,
    ) -> Result<(), SlotError> {
        self.update(caller, ConfigField::SourceAddress, StorageWord::Address(address))
    }

    /// Change the minimum threshold. Owner-gated; zero means "always pass".
    pub fn update_minimum_threshold(
        &mut self,
        caller: Address,
        value: u128,
    ) -> Result<(), SlotError> {
        self.update(caller, ConfigField::MinimumThreshold, StorageWord::Uint(value))
    }

    /// Read one configuration field through the current logic's layout.
    pub fn read(&self, field: ConfigField) -> Result<Option<StorageWord>, SlotError> {
        Ok(self.bound_logic()?.read(&self.storage, field)?)
    }

    /// The bound source address, `None` if unset.
    pub fn source_address(&self) -> Result<Option<Address>, SlotError> {
        Ok(self
            .read(ConfigField::SourceAddress)?
            .and_then(|w| w.as_address())
            .filter(|a| !a.is_zero()))
    }

    /// The configured minimum threshold, `None` if unset.
    pub fn minimum_threshold(&self) -> Result<Option<u128>, SlotError> {
        Ok(self.read(ConfigField::MinimumThreshold)?.and_then(|w| w.as_uint()))
    }

    fn bound_logic(&self) -> Result<Arc<dyn RuleModule>, SlotError> {
        self.logic
            .clone()
            .ok_or(SlotError::NotInitialized { slot: self.address })
    }

    fn record_revision(&mut self, logic: &dyn RuleModule) {
        self.revisions.push(LogicRevision {
            module: logic.name(),
            revision: logic.revision(),
            installed_at: Timestamp::now(),
        });
    }
}
