//! # Registry and Slot Errors
//!
//! Configuration and authorization failures. Every one of these is raised
//! before any state is touched, so a failed call leaves the registry or
//! slot exactly as it was.

use thiserror::Error;

use tce_core::{Address, AuthError};
use tce_modules::{ModuleError, StorageError};

/// A module slot call was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// The caller is not the slot owner.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// `initialize` was called on a slot that already ran it.
    #[error("module slot {slot} is already initialized")]
    AlreadyInitialized {
        /// The slot address.
        slot: Address,
    },

    /// A forwarded call reached a slot with no logic bound.
    #[error("module slot {slot} is not initialized")]
    NotInitialized {
        /// The slot address.
        slot: Address,
    },

    /// The logic refused the call.
    #[error("module error: {0}")]
    Module(#[from] ModuleError),

    /// The new logic cannot read the existing storage.
    #[error("cannot upgrade slot {slot} from {from} to {to}: {source}")]
    IncompatibleUpgrade {
        /// The slot address.
        slot: Address,
        /// Current logic name.
        from: &'static str,
        /// Proposed logic name.
        to: &'static str,
        /// The layout conflict.
        #[source]
        source: StorageError,
    },
}

/// A registry call was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller is not the registry owner.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// The slot is already in the module set.
    #[error("module {slot} is already attached")]
    AlreadyAttached {
        /// The slot address.
        slot: Address,
    },

    /// The slot is not in the module set.
    #[error("module {slot} is not attached")]
    NotAttached {
        /// The slot address.
        slot: Address,
    },
}
