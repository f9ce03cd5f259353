//! Clause builders (spec.md §4.5, §9 OQ1): one `Result`-returning function per clause
//! shape, rather than a generic "build a clause" entry point with a discriminant argument.

use super::Clause;
use crate::abi::{encode_with_selector, function_selector, Token};
use crate::address::Address;
use crate::error::Result;

/// The VeChain energy (VTHO) system contract address.
pub const VTHO_CONTRACT_ADDRESS: Address = Address([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x45, 0x6e, 0x65,
    0x72, 0x67, 0x79, 0x00, 0x00,
]);

fn value_from_u128(amount: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&amount.to_be_bytes());
    out
}

/// A plain VET transfer: `amount_wei` to `to`, no call data.
pub fn vet_transfer(to: Address, amount_wei: u128) -> Clause {
    Clause::new(Some(to), value_from_u128(amount_wei), Vec::new())
}

/// A VTHO (energy) transfer, encoded as an ERC20-style `transfer(address,uint256)` call
/// against the system energy contract.
pub fn vtho_transfer(to: Address, amount_wei: u128) -> Result<Clause> {
    let selector = function_selector("transfer(address,uint256)");
    let mut amount = [0u8; 32];
    amount[16..].copy_from_slice(&amount_wei.to_be_bytes());
    let data = encode_with_selector(selector, &[Token::Address(to), Token::Uint(256, amount)]);
    Ok(Clause::new(Some(VTHO_CONTRACT_ADDRESS), [0u8; 32], data))
}

/// A contract call: `to` with pre-encoded `call_data` (selector + ABI-encoded arguments),
/// optionally carrying VET `value`.
pub fn contract_call(to: Address, call_data: Vec<u8>, value_wei: u128) -> Clause {
    Clause::new(Some(to), value_from_u128(value_wei), call_data)
}

/// A contract deployment: no `to`, `data` is the contract's init bytecode.
pub fn contract_deploy(bytecode: Vec<u8>) -> Clause {
    Clause::new(None, [0u8; 32], bytecode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vet_transfer_has_no_call_data() {
        let clause = vet_transfer(Address([0x11; 20]), 1_000_000_000_000_000_000);
        assert!(clause.is_plain_transfer());
        assert_eq!(clause.to, Some(Address([0x11; 20])));
    }

    #[test]
    fn vtho_transfer_targets_energy_contract() {
        let clause = vtho_transfer(Address([0x22; 20]), 500).unwrap();
        assert_eq!(clause.to, Some(VTHO_CONTRACT_ADDRESS));
        assert_eq!(&clause.data[0..4], &function_selector("transfer(address,uint256)"));
    }

    #[test]
    fn contract_deploy_has_no_recipient() {
        let clause = contract_deploy(vec![0x60, 0x60, 0x60, 0x40]);
        assert_eq!(clause.to, None);
    }
}
