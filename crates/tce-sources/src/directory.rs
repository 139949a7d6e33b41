//! # Source Directory
//!
//! Modules store the *address* of the source they are bound to, not the
//! source itself. The directory resolves that address at check time, so
//! rebinding a module is a plain address overwrite and a source can be
//! registered after the module pointing at it was configured.
//!
//! Resolution is strict: an empty address, or one holding a source of the
//! wrong kind, is an error the caller must treat as a denial.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use tce_core::Address;

use crate::error::SourceError;
use crate::traits::{CreditsSource, KycSource};
use crate::SourceKind;

/// A source registered in the directory.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// A credits ledger.
    Credits(Arc<dyn CreditsSource>),
    /// A KYC registry.
    Kyc(Arc<dyn KycSource>),
}

impl CredentialSource {
    /// Which interface this source offers.
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Credits(_) => SourceKind::Credits,
            Self::Kyc(_) => SourceKind::Kyc,
        }
    }
}

/// Address-keyed lookup of external credential sources.
#[derive(Debug, Default)]
pub struct SourceDirectory {
    sources: RwLock<HashMap<Address, CredentialSource>>,
}

impl SourceDirectory {
    /// An empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a credits ledger at `address`.
    pub fn register_credits(
        &self,
        address: Address,
        source: Arc<dyn CreditsSource>,
    ) -> Result<(), SourceError> {
        self.register(address, CredentialSource::Credits(source))
    }

    /// Register a KYC registry at `address`.
    pub fn register_kyc(
        &self,
        address: Address,
        source: Arc<dyn KycSource>,
    ) -> Result<(), SourceError> {
        self.register(address, CredentialSource::Kyc(source))
    }

    fn register(&self, address: Address, source: CredentialSource) -> Result<(), SourceError> {
        let mut sources = self.sources.write();
        if sources.contains_key(&address) {
            return Err(SourceError::AlreadyRegistered { address });
        }
        tracing::debug!(%address, kind = %source.kind(), "credential source registered");
        sources.insert(address, source);
        Ok(())
    }

    /// Remove whatever is registered at `address`.
    pub fn unregister(&self, address: &Address) -> Option<CredentialSource> {
        self.sources.write().remove(address)
    }

    /// The kind registered at `address`, if any.
    pub fn kind_at(&self, address: &Address) -> Option<SourceKind> {
        self.sources.read().get(address).map(CredentialSource::kind)
    }

    /// Resolve a credits ledger.
    pub fn credits(&self, address: &Address) -> Result<Arc<dyn CreditsSource>, SourceError> {
        match self.lookup(address)? {
            CredentialSource::Credits(source) => Ok(source),
            other => Err(SourceError::WrongKind {
                address: *address,
                expected: SourceKind::Credits,
                actual: other.kind(),
            }),
        }
    }

    /// Resolve a KYC registry.
    pub fn kyc(&self, address: &Address) -> Result<Arc<dyn KycSource>, SourceError> {
        match self.lookup(address)? {
            CredentialSource::Kyc(source) => Ok(source),
            other => Err(SourceError::WrongKind {
                address: *address,
                expected: SourceKind::Kyc,
                actual: other.kind(),
            }),
        }
    }

    fn lookup(&self, address: &Address) -> Result<CredentialSource, SourceError> {
        self.sources
            .read()
            .get(address)
            .cloned()
            .ok_or(SourceError::NotRegistered { address: *address })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryCredits, InMemoryKyc};

    fn credits_addr() -> Address {
        Address::from_low_u64(0xc0)
    }

    fn kyc_addr() -> Address {
        Address::from_low_u64(0xc1)
    }

    fn directory() -> SourceDirectory {
        let dir = SourceDirectory::new();
        dir.register_credits(credits_addr(), Arc::new(InMemoryCredits::new()))
            .unwrap();
        dir.register_kyc(kyc_addr(), Arc::new(InMemoryKyc::new()))
            .unwrap();
        dir
    }

    #[test]
    fn test_resolves_by_kind() {
        let dir = directory();
        assert!(dir.credits(&credits_addr()).is_ok());
        assert!(dir.kyc(&kyc_addr()).is_ok());
        assert_eq!(dir.kind_at(&kyc_addr()), Some(SourceKind::Kyc));
    }

    #[test]
    fn test_wrong_kind_is_an_error() {
        let dir = directory();
        match dir.credits(&kyc_addr()).unwrap_err() {
            SourceError::WrongKind { expected, actual, .. } => {
                assert_eq!(expected, SourceKind::Credits);
                assert_eq!(actual, SourceKind::Kyc);
            }
            other => panic!("Expected WrongKind, got: {other:?}"),
        }
    }

    #[test]
    fn test_missing_address_is_an_error() {
        let dir = directory();
        let missing = Address::from_low_u64(0xdead);
        assert_eq!(
            dir.kyc(&missing).unwrap_err(),
            SourceError::NotRegistered { address: missing }
        );
    }

    #[test]
    fn test_double_registration_is_rejected() {
        let dir = directory();
        let err = dir
            .register_credits(credits_addr(), Arc::new(InMemoryCredits::new()))
            .unwrap_err();
        assert_eq!(err, SourceError::AlreadyRegistered { address: credits_addr() });
    }

    #[test]
    fn test_resolution_sees_live_updates() {
        let ledger = Arc::new(InMemoryCredits::new());
        let dir = SourceDirectory::new();
        dir.register_credits(credits_addr(), ledger.clone()).unwrap();

        let who = Address::from_low_u64(1);
        ledger.set_credits(who, 42);
        let resolved = dir.credits(&credits_addr()).unwrap();
        assert_eq!(resolved.credits_of(&who).unwrap(), 42);
    }

    #[test]
    fn test_unregister() {
        let dir = directory();
        assert!(dir.unregister(&kyc_addr()).is_some());
        assert!(dir.kyc(&kyc_addr()).is_err());
    }
}
