// crates/deflect-core/src/identity.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeflectError;

/// Index of a reward pool, assigned sequentially by `add_reward_pool`.
pub type PoolId = usize;

/// Seconds since an arbitrary epoch (block timestamp in the deployed setting).
pub type Timestamp = u64;

/// A 20-byte account or contract address.
///
/// Stakers, the treasury, the dev fund, and the engine's custody account are
/// all addresses. Formats as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

/// Assets are identified by their token contract address.
pub type AssetId = Address;

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Burn sink: `0x000000000000000000000000000000000000dEaD`.
    pub const DEAD: Address = Address([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xde, 0xad,
    ]);

    /// An address with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Address([byte; 20])
    }

    /// An address whose low 8 bytes hold `n` big-endian.
    pub fn from_low_u64_be(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = DeflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(DeflectError::Parse(format!(
                "address '{}' must be 40 hex digits, got {}",
                s,
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = DeflectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_round_trip() {
        let s = "0x488874e8b9c7999a853b2b2f4c1dd8b952b3c2db";
        let address: Address = s.parse().unwrap();
        assert_eq!(address.to_string(), s);
    }

    #[test]
    fn test_parse_accepts_mixed_case() {
        let address: Address = "0x69952B9cF895013c1e4077f241025Ec06c3C5Fc3".parse().unwrap();
        assert_eq!(
            address.to_string(),
            "0x69952b9cf895013c1e4077f241025ec06c3c5fc3"
        );
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!("0x1234".parse::<Address>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!("0xzz8874e8b9c7999a853b2b2f4c1dd8b952b3c2db"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn test_dead_address() {
        assert_eq!(
            Address::DEAD.to_string(),
            "0x000000000000000000000000000000000000dead"
        );
    }

    #[test]
    fn test_from_low_u64() {
        let address = Address::from_low_u64_be(0x0102);
        assert_eq!(address.0[18], 0x01);
        assert_eq!(address.0[19], 0x02);
        assert!(!address.is_zero());
        assert!(Address::ZERO.is_zero());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let address = Address::repeat_byte(0xab);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
