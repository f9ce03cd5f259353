//! The transaction data model (spec.md §4.6): legacy and dynamic-fee variants, their RLP
//! wire format, and intrinsic gas calculation.

mod gas;
mod model;

pub use gas::intrinsic_gas;
pub use model::{
    DynamicFeeTx, LegacyTx, Reserved, Transaction, DYNAMIC_FEE_TX_TYPE, VIP191_DELEGATED_BIT,
};
