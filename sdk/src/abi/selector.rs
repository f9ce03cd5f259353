//! Function and event selectors (spec.md §4.9): the first 4 bytes of `keccak256(signature)`
//! for calls, the full 32-byte hash for event topic0.

use crate::hash::keccak256;

/// The 4-byte function selector for a canonical signature like `transfer(address,uint256)`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// The 32-byte event topic0 for a canonical signature like `Transfer(address,address,uint256)`.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    /// spec.md §8 S6.
    #[test]
    fn transfer_selector_matches_vector() {
        let selector = function_selector("transfer(address,uint256)");
        assert_eq!(hex::to_hex(&selector), "0xa9059cbb");
    }
}
