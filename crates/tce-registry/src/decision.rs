//! # Compliance Decisions
//!
//! The full, per-module outcome of evaluating one transfer. Returned to
//! the caller and never stored.

use tce_core::Address;
use tce_modules::Rejection;

/// One module's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The module approves the transfer.
    Approved,
    /// The module's rule is not satisfied.
    Denied,
    /// The module explicitly rejected the transfer, or failed closed.
    Rejected(Rejection),
}

impl Verdict {
    /// Whether this verdict lets the transfer through.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<Result<bool, Rejection>> for Verdict {
    fn from(result: Result<bool, Rejection>) -> Self {
        match result {
            Ok(true) => Self::Approved,
            Ok(false) => Self::Denied,
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => f.write_str("APPROVED"),
            Self::Denied => f.write_str("DENIED"),
            Self::Rejected(r) => write!(f, "REJECTED ({r})"),
        }
    }
}

/// The verdict of one attached module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVerdict {
    /// Slot address of the module.
    pub slot: Address,
    /// Name of the module logic, `None` for an uninitialized slot.
    pub module: Option<&'static str>,
    /// What it decided.
    pub verdict: Verdict,
}

/// Verdicts of every attached module, in attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceDecision {
    /// Per-module verdicts.
    pub verdicts: Vec<ModuleVerdict>,
}

impl ComplianceDecision {
    /// Whether every module approved. Vacuously true with no modules.
    pub fn allowed(&self) -> bool {
        self.verdicts.iter().all(|v| v.verdict.is_approved())
    }

    /// The verdicts that block the transfer.
    pub fn blocking(&self) -> impl Iterator<Item = &ModuleVerdict> {
        self.verdicts.iter().filter(|v| !v.verdict.is_approved())
    }
}
