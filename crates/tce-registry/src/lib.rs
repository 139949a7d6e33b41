//! # tce-registry — Compliance Registry and Module Slots
//!
//! The engine proper:
//!
//! - **Slot** (`slot.rs`): [`ModuleSlot`], the upgradeable proxy owning a
//!   module's storage, with one-shot initialization and layout-checked
//!   logic upgrades.
//! - **Registry** (`registry.rs`): [`ComplianceRegistry`], the ordered
//!   module set and the all-modules-approve check.
//! - **Decision** (`decision.rs`): per-module verdicts of an evaluation.
//! - **Gate** (`gate.rs`): [`TransferGate`], the interface ledgers call.
//!
//! ## Concurrency
//!
//! A check runs synchronously to completion. It holds read guards on the
//! slots it visits and receives module storage by shared reference, so it
//! cannot change configuration. Atomicity against concurrent mutation is
//! the host's responsibility.

pub mod decision;
pub mod error;
pub mod gate;
pub mod registry;
pub mod slot;

pub use decision::{ComplianceDecision, ModuleVerdict, Verdict};
pub use error::{RegistryError, SlotError};
pub use gate::TransferGate;
pub use registry::{share, ComplianceRegistry, SharedSlot};
pub use slot::{InitState, LogicRevision, ModuleSlot};
