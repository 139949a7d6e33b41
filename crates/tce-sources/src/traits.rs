//! # Credential Source Interfaces
//!
//! The read-only query surface rule modules consult. Sources live outside
//! the engine; the engine only ever holds them by `Arc` and never caches
//! an answer between checks.
//!
//! Both traits require `Send + Sync` so a source can be shared between a
//! directory, the modules resolving it, and whoever keeps it up to date.

use tce_core::Address;

use crate::error::SourceError;

/// A ledger of compliance credits per identity.
pub trait CreditsSource: Send + Sync + std::fmt::Debug {
    /// Current credit balance of `identity`. Unknown identities hold zero.
    fn credits_of(&self, identity: &Address) -> Result<u128, SourceError>;
}

/// A registry of KYC-verified identities.
pub trait KycSource: Send + Sync + std::fmt::Debug {
    /// Whether `identity` has passed KYC.
    fn is_verified(&self, identity: &Address) -> Result<bool, SourceError>;
}
