//! # Owner Authorization
//!
//! Every mutating operation on a registry or a module slot starts with an
//! explicit [`Ownership::authorize`] call comparing the caller against the
//! recorded owner. There is no implicit access control: a method that
//! skips the call is not owner-gated.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::AuthError;

/// The owner record of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    /// Record `owner` as the owner.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// The current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Succeeds iff `caller` is the owner.
    ///
    /// `action` names the attempted operation in the error message.
    pub fn authorize(&self, caller: Address, action: &str) -> Result<(), AuthError> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::warn!(%caller, owner = %self.owner, action, "unauthorized call rejected");
            Err(AuthError::NotOwner {
                caller,
                owner: self.owner,
                action: action.to_string(),
            })
        }
    }

    /// Hand ownership to `new_owner`. Owner-gated; the zero address is refused.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<(), AuthError> {
        self.authorize(caller, "transfer ownership")?;
        if new_owner.is_zero() {
            return Err(AuthError::ZeroOwner);
        }
        tracing::info!(previous = %self.owner, %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::from_low_u64(0xa11ce)
    }

    fn bob() -> Address {
        Address::from_low_u64(0xb0b)
    }

    #[test]
    fn test_owner_is_authorized() {
        let o = Ownership::new(alice());
        assert!(o.authorize(alice(), "update").is_ok());
    }

    #[test]
    fn test_stranger_is_rejected_with_context() {
        let o = Ownership::new(alice());
        match o.authorize(bob(), "add module").unwrap_err() {
            AuthError::NotOwner { caller, owner, action } => {
                assert_eq!(caller, bob());
                assert_eq!(owner, alice());
                assert_eq!(action, "add module");
            }
            other => panic!("Expected NotOwner, got: {other:?}"),
        }
    }

    #[test]
    fn test_transfer_moves_authority() {
        let mut o = Ownership::new(alice());
        o.transfer(alice(), bob()).unwrap();
        assert_eq!(o.owner(), bob());
        assert!(o.authorize(alice(), "update").is_err());
        assert!(o.authorize(bob(), "update").is_ok());
    }

    #[test]
    fn test_transfer_requires_owner() {
        let mut o = Ownership::new(alice());
        assert!(o.transfer(bob(), bob()).is_err());
        assert_eq!(o.owner(), alice());
    }

    #[test]
    fn test_transfer_to_zero_is_refused() {
        let mut o = Ownership::new(alice());
        assert_eq!(o.transfer(alice(), Address::ZERO), Err(AuthError::ZeroOwner));
        assert_eq!(o.owner(), alice());
    }
}
