//! # Compliance Registry
//!
//! The ordered set of module slots protecting one asset, and the check
//! a ledger runs before every transfer.
//!
//! ## Aggregation
//!
//! A transfer is permitted iff every attached module approves: unweighted
//! logical conjunction over the set, evaluated in attachment order. An
//! explicit rejection, a plain "not satisfied", and a fail-closed outcome
//! all count as denial. With no modules attached the conjunction is
//! vacuous and the transfer is permitted.
//!
//! [`ComplianceRegistry::module_check`] stops at the first denial.
//! [`ComplianceRegistry::evaluate`] asks every module. Checks are
//! read-only, so both always agree on the outcome.
//!
//! ## Shared Slots
//!
//! Slots are held as [`SharedSlot`] (`Arc<RwLock<ModuleSlot>>`). The owner
//! keeps a handle to configure a module directly while it is attached; a
//! check only ever takes read guards. Detaching a slot hands the handle
//! back with its storage intact.

use std::sync::Arc;

use parking_lot::RwLock;

use tce_core::{Address, Ownership, TransferCheckRequest};
use tce_sources::SourceDirectory;

use crate::decision::{ComplianceDecision, ModuleVerdict, Verdict};
use crate::error::RegistryError;
use crate::gate::TransferGate;
use crate::slot::ModuleSlot;

/// A module slot shared between the registry and its owner.
pub type SharedSlot = Arc<RwLock<ModuleSlot>>;

/// Wrap a slot for attachment.
pub fn share(slot: ModuleSlot) -> SharedSlot {
    Arc::new(RwLock::new(slot))
}

#[derive(Debug, Clone)]
struct AttachedModule {
    address: Address,
    slot: SharedSlot,
}

/// The ordered module set of one protected asset.
#[derive(Debug)]
pub struct ComplianceRegistry {
    ownership: Ownership,
    sources: Arc<SourceDirectory>,
    modules: Vec<AttachedModule>,
}

impl ComplianceRegistry {
    /// An empty registry owned by `owner`, resolving module sources
    /// through `sources`.
    pub fn new(owner: Address, sources: Arc<SourceDirectory>) -> Self {
        Self {
            ownership: Ownership::new(owner),
            sources,
            modules: Vec::new(),
        }
    }

    /// The registry owner.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// Hand the registry to a new owner. Owner-gated.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        self.ownership.transfer(caller, new_owner)?;
        Ok(())
    }

    /// The source directory modules resolve against.
    pub fn sources(&self) -> &Arc<SourceDirectory> {
        &self.sources
    }

    /// Append `slot` to the module set. Owner-gated.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Unauthorized`] if `caller` is not the owner.
    /// - [`RegistryError::AlreadyAttached`] if a slot with the same
    ///   address is already in the set.
    pub fn add_module(&mut self, caller: Address, slot: SharedSlot) -> Result<(), RegistryError> {
        self.ownership.authorize(caller, "add module")?;

        let (address, name) = {
            let guard = slot.read();
            (guard.address(), guard.name().ok())
        };
        if self.position(&address).is_some() {
            return Err(RegistryError::AlreadyAttached { slot: address });
        }
        if name.is_none() {
            tracing::warn!(
                slot = %address,
                "attaching uninitialized module; it will deny every transfer"
            );
        }

        self.modules.push(AttachedModule { address, slot });
        tracing::info!(
            slot = %address,
            module = name.unwrap_or("-"),
            modules = self.modules.len(),
            "module attached"
        );
        Ok(())
    }

    /// Remove the slot at `address` from the set. Owner-gated.
    ///
    /// The remaining modules keep their relative order. The detached slot
    /// is returned with its storage untouched.
    pub fn remove_module(
        &mut self,
        caller: Address,
        address: &Address,
    ) -> Result<SharedSlot, RegistryError> {
        self.ownership.authorize(caller, "remove module")?;

        let index = self
            .position(address)
            .ok_or(RegistryError::NotAttached { slot: *address })?;
        let detached = self.modules.remove(index);
        tracing::info!(slot = %address, modules = self.modules.len(), "module detached");
        Ok(detached.slot)
    }

    /// Slot addresses in attachment order.
    pub fn modules(&self) -> Vec<Address> {
        self.modules.iter().map(|m| m.address).collect()
    }

    /// Whether a slot with `address` is attached.
    pub fn is_attached(&self, address: &Address) -> bool {
        self.position(address).is_some()
    }

    /// The attached slot at `address`.
    pub fn slot(&self, address: &Address) -> Option<SharedSlot> {
        self.position(address).map(|i| self.modules[i].slot.clone())
    }

    /// Number of attached modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are attached.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Whether `request` may proceed: true iff every attached module
    /// approves. Stops at the first denial.
    pub fn module_check(&self, request: &TransferCheckRequest) -> bool {
        self.modules.iter().all(|m| {
            let verdict = self.verdict_of(m, request);
            verdict.verdict.is_approved()
        })
    }

    /// Ask every attached module about `request`, in attachment order.
    pub fn evaluate(&self, request: &TransferCheckRequest) -> ComplianceDecision {
        ComplianceDecision {
            verdicts: self.modules.iter().map(|m| self.verdict_of(m, request)).collect(),
        }
    }

    fn verdict_of(&self, module: &AttachedModule, request: &TransferCheckRequest) -> ModuleVerdict {
        let slot = module.slot.read();
        let verdict = Verdict::from(slot.check(&self.sources, request));
        let name = slot.name().ok();

        match &verdict {
            Verdict::Rejected(rejection) if !rejection.is_rule_violation() => {
                tracing::warn!(
                    slot = %module.address,
                    module = name.unwrap_or("-"),
                    %rejection,
                    "module failed closed"
                );
            }
            _ => {
                tracing::debug!(
                    slot = %module.address,
                    module = name.unwrap_or("-"),
                    %verdict,
                    "module verdict"
                );
            }
        }

        ModuleVerdict {
            slot: module.address,
            module: name,
            verdict,
        }
    }

    fn position(&self, address: &Address) -> Option<usize> {
        self.modules.iter().position(|m| m.address == *address)
    }
}

impl TransferGate for ComplianceRegistry {
    fn module_check(&self, request: &TransferCheckRequest) -> bool {
        ComplianceRegistry::module_check(self, request)
    }
}
