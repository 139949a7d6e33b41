//! # Transfer Gate
//!
//! The single call a ledger makes into the engine. Ledgers depend on this
//! trait rather than on [`ComplianceRegistry`](crate::ComplianceRegistry)
//! so they can be tested against a fixed gate.

use tce_core::TransferCheckRequest;

/// Decides whether a candidate transfer may execute.
///
/// Called synchronously before any balance changes. `false` blocks the
/// transfer.
pub trait TransferGate {
    /// Whether `request` may proceed.
    fn module_check(&self, request: &TransferCheckRequest) -> bool;
}
