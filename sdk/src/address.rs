//! Address derivation and EIP-55 checksum casing (spec.md §4.1).
//!
//! An `Address` is 20 raw bytes internally; only string formatting introduces case.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::hex;

/// A 20-byte VeChain/Ethereum-style account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 20 {
            return Err(Error::InvalidAddress(format!(
                "expected 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(bytes);
        Ok(Address(out))
    }

    /// Derive the address of the secp256k1 public key `x‖y` (spec property 11: identical
    /// to the Ethereum address algorithm since both use Keccak-256).
    pub fn from_pubkey(pubkey_xy: &[u8; 64]) -> Self {
        let hash = keccak256(pubkey_xy);
        let mut out = [0u8; 20];
        out.copy_from_slice(&hash[12..32]);
        Address(out)
    }

    /// EIP-55 checksum-cased hex string.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode_lower(&self.0);
        let hash = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            if c.is_ascii_digit() {
                out.push(c);
                continue;
            }
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };
            if nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::from_hex(s)?;
        Address::from_slice(&bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Address::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec.md §8 S3.
    #[test]
    fn address_from_known_private_key() {
        let key_hex = "5434C159B817C377A55F6BE66369622976014E78BCE2ADFD3E44E5DE88CE502F";
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&hex::from_hex(key_hex).unwrap());
        let key = crate::secp256k1::PrivateKey::from_bytes(key_bytes).unwrap();
        let pubkey = crate::secp256k1::to_pubkey(&key).unwrap();
        let address = Address::from_pubkey(&pubkey);
        assert_eq!(address.to_checksum(), "0x769E8AA372c8309c834EA6749B88861FF73581FF");
    }

    #[test]
    fn checksum_roundtrips_through_parse() {
        let address = Address([0x11; 20]);
        let checksum = address.to_checksum();
        let parsed: Address = checksum.parse().unwrap();
        assert_eq!(address, parsed);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Address::from_slice(&[0u8; 19]).is_err());
        assert!(Address::from_slice(&[0u8; 21]).is_err());
    }
}
