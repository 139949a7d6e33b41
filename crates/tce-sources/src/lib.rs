//! # tce-sources — External Credential Sources
//!
//! The out-of-engine data providers rule modules consult:
//!
//! - **Traits** (`traits.rs`): [`CreditsSource`] and [`KycSource`], the
//!   read-only query interfaces.
//! - **Memory** (`memory.rs`): process-local implementations.
//! - **Directory** (`directory.rs`): [`SourceDirectory`], resolving the
//!   source address a module is bound to at check time.
//!
//! Sources are read, never advanced, by a transfer check.

pub mod directory;
pub mod error;
pub mod memory;
pub mod traits;

use serde::{Deserialize, Serialize};

pub use directory::{CredentialSource, SourceDirectory};
pub use error::SourceError;
pub use memory::{InMemoryCredits, InMemoryKyc};
pub use traits::{CreditsSource, KycSource};

/// The interface a credential source offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Credits balance per identity.
    Credits,
    /// KYC verification status per identity.
    Kyc,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Credits => f.write_str("credits"),
            Self::Kyc => f.write_str("kyc"),
        }
    }
}
