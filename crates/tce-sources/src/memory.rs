//! # In-Memory Sources
//!
//! Process-local implementations of the credential source traits. Used by
//! the CLI (populated from the engine YAML file) and by tests standing in
//! for the real credits ledger and KYC registry.
//!
//! Writers go through `&self` so a source can be updated while it is
//! shared with the modules reading it.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use tce_core::Address;

use crate::error::SourceError;
use crate::traits::{CreditsSource, KycSource};

/// A credits ledger held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCredits {
    balances: RwLock<HashMap<Address, u128>>,
}

impl InMemoryCredits {
    /// An empty ledger; every identity holds zero credits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger from `(identity, balance)` pairs.
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, u128)>) -> Self {
        Self {
            balances: RwLock::new(balances.into_iter().collect()),
        }
    }

    /// Overwrite the balance of `identity`.
    pub fn set_credits(&self, identity: Address, credits: u128) {
        self.balances.write().insert(identity, credits);
    }
}

impl CreditsSource for InMemoryCredits {
    fn credits_of(&self, identity: &Address) -> Result<u128, SourceError> {
        Ok(self.balances.read().get(identity).copied().unwrap_or(0))
    }
}

/// A KYC registry held in memory.
#[derive(Debug, Default)]
pub struct InMemoryKyc {
    verified: RwLock<HashSet<Address>>,
}

impl InMemoryKyc {
    /// A registry in which nobody is verified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry with already-verified identities.
    pub fn with_verified(identities: impl IntoIterator<Item = Address>) -> Self {
        Self {
            verified: RwLock::new(identities.into_iter().collect()),
        }
    }

    /// Mark `identity` as verified.
    pub fn verify(&self, identity: Address) {
        self.verified.write().insert(identity);
    }

    /// Withdraw the verification of `identity`.
    pub fn revoke(&self, identity: &Address) {
        self.verified.write().remove(identity);
    }
}

impl KycSource for InMemoryKyc {
    fn is_verified(&self, identity: &Address) -> Result<bool, SourceError> {
        Ok(self.verified.read().contains(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_identity_has_zero_credits() {
        let ledger = InMemoryCredits::new();
        assert_eq!(ledger.credits_of(&Address::from_low_u64(7)).unwrap(), 0);
    }

    #[test]
    fn test_set_credits_overwrites() {
        let who = Address::from_low_u64(7);
        let ledger = InMemoryCredits::with_balances([(who, 10)]);
        ledger.set_credits(who, 150);
        assert_eq!(ledger.credits_of(&who).unwrap(), 150);
    }

    #[test]
    fn test_kyc_verify_and_revoke() {
        let who = Address::from_low_u64(9);
        let kyc = InMemoryKyc::new();
        assert!(!kyc.is_verified(&who).unwrap());
        kyc.verify(who);
        assert!(kyc.is_verified(&who).unwrap());
        kyc.revoke(&who);
        assert!(!kyc.is_verified(&who).unwrap());
    }
}
