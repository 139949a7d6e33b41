//! # Transfer Check Request
//!
//! The candidate transfer a ledger asks the engine about. Built per
//! transfer attempt, handed to the aggregation protocol by reference, and
//! dropped afterwards. Nothing in the engine stores one.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A candidate transfer to be checked against the attached rule modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCheckRequest {
    /// The account debited by the transfer.
    pub sender: Address,
    /// The account credited by the transfer.
    pub recipient: Address,
    /// Amount in the asset's smallest unit.
    pub amount: u128,
    /// Opaque auxiliary data forwarded untouched to every module.
    #[serde(default)]
    pub aux_data: Vec<u8>,
}

impl TransferCheckRequest {
    /// A request with no auxiliary data.
    pub fn new(sender: Address, recipient: Address, amount: u128) -> Self {
        Self {
            sender,
            recipient,
            amount,
            aux_data: Vec::new(),
        }
    }

    /// Attach auxiliary data.
    pub fn with_aux_data(mut self, aux_data: impl Into<Vec<u8>>) -> Self {
        self.aux_data = aux_data.into();
        self
    }
}

impl std::fmt::Display for TransferCheckRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ({} units, {} aux bytes)",
            self.sender,
            self.recipient,
            self.amount,
            self.aux_data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_aux_data() {
        let req = TransferCheckRequest::new(Address::from_low_u64(1), Address::from_low_u64(2), 100)
            .with_aux_data(vec![0x78, 0x9]);
        assert_eq!(req.amount, 100);
        assert_eq!(req.aux_data, vec![0x78, 0x9]);
    }

    #[test]
    fn test_aux_data_defaults_to_empty_when_deserialized() {
        let json = r#"{
            "sender": "0x0000000000000000000000000000000000000123",
            "recipient": "0x0000000000000000000000000000000000000456",
            "amount": 100
        }"#;
        let req: TransferCheckRequest = serde_json::from_str(json).unwrap();
        assert!(req.aux_data.is_empty());
        assert_eq!(req.sender, Address::from_low_u64(0x123));
    }
}
