//! # Module Errors
//!
//! Two families that must never be confused:
//!
//! - [`Rejection`] — the module denies the transfer. Either a rule
//!   violation (`NotEnoughCredits`) or a fail-closed outcome because the
//!   module cannot reach a decision (unset source, unreachable source,
//!   unreadable storage). A rejection is a decision, not a fault.
//! - [`ModuleError`] — a configuration call was refused. No storage was
//!   changed.

use thiserror::Error;

use tce_core::Address;
use tce_sources::SourceError;

use crate::storage::{ConfigField, StorageError, WordKind};

/// A module's explicit denial of a transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The sender's credit balance is below the configured minimum.
    #[error("NotEnoughCredits: sender holds {available}, {required} required")]
    NotEnoughCredits {
        /// Credits the sender holds.
        available: u128,
        /// Credits the module requires.
        required: u128,
    },

    /// The module has no source address configured.
    #[error("{module}: no credential source configured")]
    SourceUnset {
        /// Module name.
        module: &'static str,
    },

    /// A configuration field the decision depends on is unset.
    #[error("{module}: {field} is not configured")]
    ConfigurationUnset {
        /// Module name.
        module: &'static str,
        /// The missing field.
        field: ConfigField,
    },

    /// The bound source could not be resolved or could not answer.
    #[error("{module}: credential source unavailable: {source}")]
    SourceUnavailable {
        /// Module name.
        module: &'static str,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },

    /// The slot has no logic bound yet.
    #[error("module slot {slot} is not initialized")]
    Uninitialized {
        /// The slot address.
        slot: Address,
    },

    /// The module's storage could not be read under its layout.
    #[error("{module}: unreadable configuration: {source}")]
    CorruptStorage {
        /// Module name.
        module: &'static str,
        /// Underlying storage failure.
        #[source]
        source: StorageError,
    },
}

impl Rejection {
    /// Whether this is a rule violation, as opposed to a fail-closed
    /// outcome caused by missing or broken configuration.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, Self::NotEnoughCredits { .. })
    }
}

/// A configuration call refused by the module logic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// The logic does not expose this field.
    #[error("{module} has no {field} setting")]
    UnsupportedField {
        /// Module name.
        module: &'static str,
        /// The requested field.
        field: ConfigField,
    },

    /// The supplied value has the wrong kind for the field.
    #[error("{field} expects a {expected} value, got {found}")]
    WrongValueKind {
        /// The target field.
        field: ConfigField,
        /// Kind the field stores.
        expected: WordKind,
        /// Kind supplied.
        found: WordKind,
    },

    /// The supplied value is not acceptable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// The target field.
        field: ConfigField,
        /// Why the value was refused.
        reason: String,
    },

    /// The initialization payload lacks a required field.
    #[error("{module} initialization requires {field}")]
    MissingInitValue {
        /// Module name.
        module: &'static str,
        /// The missing field.
        field: ConfigField,
    },

    /// The initialization payload sets the same field twice.
    #[error("initialization payload sets {field} more than once")]
    DuplicateInitValue {
        /// The repeated field.
        field: ConfigField,
    },

    /// Storage failure while applying a configuration call.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
