//! # Address Newtype
//!
//! Every participant the engine reasons about is an [`Address`]: transfer
//! senders and recipients, registry and slot owners, module slots, and
//! the external credential sources modules are bound to. One type keeps
//! the surface small; the role of an address is carried by the field it
//! sits in, not by its representation.
//!
//! ## Format
//!
//! 20 bytes, written as `0x` followed by exactly 40 hex digits. Parsing
//! accepts either case; display is always lowercase.
//!
//! ## The Zero Address
//!
//! [`Address::ZERO`] is reserved as "unset". Configuration that stores an
//! address treats zero as missing, and rule modules fail closed on it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account or component address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, meaning "unset".
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Construct from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Construct an address whose last 8 bytes hold `n` big-endian.
    ///
    /// Handy for fixtures and for deterministic component numbering.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// A fresh random address. Never returns [`Address::ZERO`].
    pub fn random() -> Self {
        loop {
            let bytes: [u8; ADDRESS_LEN] = rand::random();
            let candidate = Self(bytes);
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the reserved zero address.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a `0x`-prefixed, 40-digit hex string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAddress`] if the prefix is missing,
    /// the length is wrong, or any digit is not hex.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidAddress {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| invalid("missing 0x prefix"))?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid("expected 40 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("non-hex character"));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid("non-hex character"))?;
        }
        Ok(Self(bytes))
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// Routed through `parse` so malformed addresses are rejected at load time.
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn test_parse_and_display() {
        let addr = Address::parse(SAMPLE).unwrap();
        assert_eq!(addr.to_string(), SAMPLE);
        assert_eq!(addr.as_bytes()[0], 0x12);
        assert_eq!(addr.as_bytes()[19], 0x78);
    }

    #[test]
    fn test_parse_is_case_insensitive_display_is_lowercase() {
        let addr = Address::parse("0xF369F78E3A0492CC4E96A90DAE0728A38498E9C7").unwrap();
        assert_eq!(addr.to_string(), "0xf369f78e3a0492cc4e96a90dae0728a38498e9c7");
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let err = Address::parse("1234567890abcdef1234567890abcdef12345678").unwrap_err();
        assert!(err.to_string().contains("0x prefix"));
    }

    #[test]
    fn test_parse_rejects_short_address() {
        assert!(Address::parse("0x123").is_err());
        // 36 digits: one of the classic copy-paste mistakes.
        assert!(Address::parse("0xabcdefabcdefabcdefabcdefabcdefabcdef").is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(Address::parse("0xzz34567890abcdef1234567890abcdef12345678").is_err());
    }

    #[test]
    fn test_zero_and_default() {
        assert!(Address::ZERO.is_zero());
        assert_eq!(Address::default(), Address::ZERO);
        assert!(!Address::from_low_u64(1).is_zero());
    }

    #[test]
    fn test_random_is_never_zero() {
        for _ in 0..32 {
            assert!(!Address::random().is_zero());
        }
    }

    #[test]
    fn test_from_low_u64_places_bytes_at_the_end() {
        let addr = Address::from_low_u64(0x0102);
        assert_eq!(
            addr.to_string(),
            "0x0000000000000000000000000000000000000102"
        );
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let addr = Address::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));

        let bad: Result<Address, _> = serde_json::from_str("\"0x123\"");
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_display_parse_is_identity(bytes in any::<[u8; 20]>()) {
            let addr = Address::from_bytes(bytes);
            prop_assert_eq!(Address::parse(&addr.to_string()).unwrap(), addr);
        }
    }
}
