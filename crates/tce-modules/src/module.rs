//! # Rule Module Contract
//!
//! A [`RuleModule`] is pure logic. It owns no configuration: every call
//! receives the storage of the slot running it. That is what lets a slot
//! replace its logic without losing configuration.
//!
//! ## Call Surface
//!
//! - `check` — read-only; takes `&ModuleStorage`, so a check cannot
//!   mutate configuration. Returns `Ok(true)` to approve, `Ok(false)` for
//!   a plain "not satisfied", and `Err(Rejection)` for an explicit denial.
//!   Unset configuration is always an `Err`, never an approval.
//! - `initialize` / `update` / `read` — configuration, driven through the
//!   logic's [`StorageLayout`]. The provided implementations cover every
//!   module whose configuration is plain fields; a module overrides them
//!   only to add validation.
//!
//! Owner gating and one-shot initialization are enforced by the slot,
//! not here.

use tce_core::TransferCheckRequest;
use tce_sources::SourceDirectory;

use crate::error::{ModuleError, Rejection};
use crate::storage::{ConfigField, FieldSlot, ModuleStorage, StorageLayout, StorageWord};

/// Constructor arguments applied once when a slot is initialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitPayload {
    values: Vec<(ConfigField, StorageWord)>,
}

impl InitPayload {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`.
    pub fn with(mut self, field: ConfigField, value: StorageWord) -> Self {
        self.values.push((field, value));
        self
    }

    /// Set the source address.
    pub fn source_address(self, address: tce_core::Address) -> Self {
        self.with(ConfigField::SourceAddress, StorageWord::Address(address))
    }

    /// Set the minimum threshold.
    pub fn minimum_threshold(self, value: u128) -> Self {
        self.with(ConfigField::MinimumThreshold, StorageWord::Uint(value))
    }

    /// The `(field, value)` assignments in order.
    pub fn values(&self) -> &[(ConfigField, StorageWord)] {
        &self.values
    }
}

/// One compliance predicate over a transfer.
pub trait RuleModule: Send + Sync + std::fmt::Debug {
    /// Fixed identifier, independent of configuration.
    fn name(&self) -> &'static str;

    /// Logic revision. Bumped by each new release of the same module.
    fn revision(&self) -> u32 {
        1
    }

    /// Where each configuration field lives in slot storage.
    fn layout(&self) -> &'static StorageLayout;

    /// Decide on `request` using the configuration in `storage`.
    fn check(
        &self,
        storage: &ModuleStorage,
        sources: &SourceDirectory,
        request: &TransferCheckRequest,
    ) -> Result<bool, Rejection>;

    /// Apply a constructor payload. Every field in the layout is required.
    ///
    /// Writes into `storage` as it goes; the slot stages this call on a
    /// scratch copy and commits only on success.
    fn initialize(
        &self,
        storage: &mut ModuleStorage,
        payload: &InitPayload,
    ) -> Result<(), ModuleError> {
        for (i, (field, _)) in payload.values().iter().enumerate() {
            if payload.values()[..i].iter().any(|(seen, _)| seen == field) {
                return Err(ModuleError::DuplicateInitValue { field: *field });
            }
        }
        for slot in self.layout().fields() {
            let value = payload
                .values()
                .iter()
                .find(|(field, _)| *field == slot.field)
                .map(|(_, value)| *value)
                .ok_or(ModuleError::MissingInitValue {
                    module: self.name(),
                    field: slot.field,
                })?;
            write_field(storage, slot, value)?;
        }
        if let Some((field, _)) = payload
            .values()
            .iter()
            .find(|(field, _)| self.layout().slot_of(*field).is_none())
        {
            return Err(ModuleError::UnsupportedField {
                module: self.name(),
                field: *field,
            });
        }
        Ok(())
    }

    /// Overwrite one configuration field. Idempotent.
    fn update(
        &self,
        storage: &mut ModuleStorage,
        field: ConfigField,
        value: StorageWord,
    ) -> Result<(), ModuleError> {
        let slot = self.layout().slot_of(field).ok_or(ModuleError::UnsupportedField {
            module: self.name(),
            field,
        })?;
        write_field(storage, slot, value)
    }

    /// Read one configuration field. `Ok(None)` means unset.
    fn read(
        &self,
        storage: &ModuleStorage,
        field: ConfigField,
    ) -> Result<Option<StorageWord>, ModuleError> {
        let slot = self.layout().slot_of(field).ok_or(ModuleError::UnsupportedField {
            module: self.name(),
            field,
        })?;
        Ok(storage.read(slot)?)
    }
}

/// Validate `value` against `slot` and store it.
///
/// Addresses must be non-zero, since zero reads back as unset. Integers
/// are accepted as given, zero included.
fn write_field(
    storage: &mut ModuleStorage,
    slot: &FieldSlot,
    value: StorageWord,
) -> Result<(), ModuleError> {
    if value.kind() != slot.kind {
        return Err(ModuleError::WrongValueKind {
            field: slot.field,
            expected: slot.kind,
            found: value.kind(),
        });
    }
    if let StorageWord::Address(address) = value {
        if address.is_zero() {
            return Err(ModuleError::InvalidValue {
                field: slot.field,
                reason: "address must not be zero".to_string(),
            });
        }
    }
    storage.store(slot, value)?;
    Ok(())
}
