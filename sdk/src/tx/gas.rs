//! Intrinsic gas calculation (spec.md §4.6): the minimum gas a transaction must supply
//! before any clause execution is attempted.

use crate::clause::Clause;

const TX_BASE_GAS: u64 = 5_000;
const CLAUSE_GAS: u64 = 16_000;
const CLAUSE_GAS_CONTRACT_CREATION: u64 = 48_000;
const ZERO_BYTE_GAS: u64 = 4;
const NONZERO_BYTE_GAS: u64 = 68;

fn data_gas(data: &[u8]) -> u64 {
    data.iter()
        .map(|&b| if b == 0 { ZERO_BYTE_GAS } else { NONZERO_BYTE_GAS })
        .sum()
}

/// Sum of the per-clause overhead and data cost, plus the fixed transaction base cost.
///
/// spec.md §8 S7: a single VET transfer with empty data costs exactly 21,000 — identical
/// to a plain Ethereum transfer, since `TX_BASE_GAS + CLAUSE_GAS == 21_000`.
pub fn intrinsic_gas(clauses: &[Clause]) -> u64 {
    let mut total = TX_BASE_GAS;
    if clauses.is_empty() {
        return total;
    }
    for clause in clauses {
        total += if clause.to.is_none() {
            CLAUSE_GAS_CONTRACT_CREATION
        } else {
            CLAUSE_GAS
        };
        total += data_gas(&clause.data);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::clause::vet_transfer;

    /// spec.md §8 S7.
    #[test]
    fn single_plain_vet_transfer_costs_21000() {
        let clauses = vec![vet_transfer(Address([0x11; 20]), 1)];
        assert_eq!(intrinsic_gas(&clauses), 21_000);
    }

    #[test]
    fn contract_creation_costs_more_than_a_call() {
        let creation = vec![crate::clause::contract_deploy(vec![0xfe; 10])];
        let call = vec![crate::clause::contract_call(Address([0x22; 20]), vec![0xfe; 10], 0)];
        assert!(intrinsic_gas(&creation) > intrinsic_gas(&call));
    }

    #[test]
    fn data_bytes_add_cost() {
        let empty = vec![vet_transfer(Address([0x11; 20]), 1)];
        let with_data = vec![crate::clause::contract_call(Address([0x11; 20]), vec![0x01, 0x00], 0)];
        assert_eq!(intrinsic_gas(&with_data) - intrinsic_gas(&empty), 68 + 4);
    }
}
