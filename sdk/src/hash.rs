//! The two 32-byte digest functions VeChain uses, kept strictly apart (spec.md §4.2).
//!
//! `blake2b256` is used for signing hashes, transaction ids and gas-payer messages.
//! `keccak256` is used for address derivation, ABI selectors and keystore MACs. Tests assert
//! the two never agree on the same input (spec property 10).

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// Unkeyed Blake2b with a 32-byte output, no salt or personalization (spec.md §9 OQ3).
type Blake2b256Hasher = Blake2b<U32>;

/// Blake2b-256 of `data`.
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256Hasher::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 of `data`, delegating to `alloy_primitives` rather than adding a second
/// SHA-3 dependency.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    alloy_primitives::keccak256(data).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    /// spec.md §8 S2.
    #[test]
    fn blake2b_hello_matches_vector() {
        let digest = blake2b256(b"hello");
        assert_eq!(
            hex::to_hex(&digest),
            "0x324dcf027dd4a30a932c441f365a25e86b173defa4b8e58948253471b81b72cf"
        );
    }

    /// spec property 10: the two hashes never agree.
    #[test]
    fn blake2b_and_keccak_are_distinct() {
        let data = b"vechainthor";
        assert_ne!(blake2b256(data), keccak256(data));
    }
}
