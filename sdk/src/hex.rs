//! Canonical hex encoding (spec.md §4.1).
//!
//! Output is always lowercase and `0x`-prefixed; input accepts mixed case with or without
//! the prefix.

use crate::error::{Error, Result};

/// Encode `bytes` as a lowercase, `0x`-prefixed hex string.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Encode `bytes` as lowercase hex with no `0x` prefix (used internally, e.g. by the EIP-55
/// checksum algorithm, which hashes the unprefixed lowercase body).
pub fn encode_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string, accepting mixed case and an optional `0x` prefix.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if stripped.is_empty() {
        return Ok(Vec::new());
    }
    if stripped.len() % 2 != 0 {
        return Err(Error::InvalidHex(format!("odd-length hex string: {s}")));
    }
    Ok(hex::decode(stripped)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        let s = to_hex(&bytes);
        assert_eq!(s, "0xdeadbeef");
        assert_eq!(from_hex(&s).unwrap(), bytes);
    }

    #[test]
    fn accepts_mixed_case_and_missing_prefix() {
        assert_eq!(from_hex("DeadBeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(from_hex("0xDEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn empty_string_is_empty_bytes() {
        assert_eq!(from_hex("0x").unwrap(), Vec::<u8>::new());
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn odd_length_is_rejected() {
        assert!(from_hex("0xabc").is_err());
    }
}
