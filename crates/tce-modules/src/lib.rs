//! # tce-modules — Rule Modules
//!
//! The compliance predicates the registry aggregates:
//!
//! - **Contract** (`module.rs`): [`RuleModule`], the logic-only interface
//!   every variant implements, and [`InitPayload`].
//! - **Storage** (`storage.rs`): [`ModuleStorage`], the slot-owned typed
//!   configuration region, and [`StorageLayout`], the positional map a
//!   logic reads it through.
//! - **Credit check** (`credit.rs`): [`EngenCreditCheck`], sender credit
//!   balance ≥ minimum threshold.
//! - **KYC check** (`kyc.rs`): [`KintoKyc`], parties verified in a KYC
//!   registry.
//!
//! ## Decision Semantics
//!
//! Identical across variants: `Ok(true)` approves, anything else denies.
//! Standalone callers see the typed [`Rejection`]; the registry folds it
//! into a boolean.

pub mod credit;
pub mod error;
pub mod kyc;
pub mod module;
pub mod storage;

pub use credit::EngenCreditCheck;
pub use error::{ModuleError, Rejection};
pub use kyc::{KintoKyc, KycPolicy};
pub use module::{InitPayload, RuleModule};
pub use storage::{
    ConfigField, FieldSlot, ModuleStorage, StorageError, StorageLayout, StorageWord, WordKind,
};
