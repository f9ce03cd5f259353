//! The pipeline's working value (spec.md §4.7, §9 redesign flag): an owned struct carried
//! by move through each step, not a string-keyed map of "maybe present" fields.

use crate::address::Address;
use crate::clause::Clause;
use crate::secp256k1::PrivateKey;
use crate::thor::types::Receipt;
use crate::tx::{Reserved, Transaction};

/// Accumulates state as a transaction moves through the pipeline's ordered steps.
///
/// Early steps (`SetChainTag`, `SetBlockRef`, ...) populate `draft`; `Sign` consumes
/// `origin_key` and fills `transaction`; `Broadcast`/`AwaitReceipt` populate `receipt`.
pub struct PipelineState {
    pub clauses: Vec<Clause>,
    pub chain_tag: Option<u8>,
    pub block_ref: Option<[u8; 8]>,
    pub expiration: Option<u32>,
    pub gas: Option<u64>,
    pub gas_price_coef: u8,
    pub depends_on: Option<[u8; 32]>,
    pub nonce: u64,
    pub reserved: Reserved,

    pub origin_key: Option<PrivateKey>,
    pub gas_payer_key: Option<PrivateKey>,
    pub origin_address: Option<Address>,

    pub transaction: Option<Transaction>,
    pub tx_id: Option<[u8; 32]>,
    pub receipt: Option<Receipt>,
}

impl PipelineState {
    pub fn new(clauses: Vec<Clause>) -> Self {
        PipelineState {
            clauses,
            chain_tag: None,
            block_ref: None,
            expiration: None,
            gas: None,
            gas_price_coef: 0,
            depends_on: None,
            nonce: 0,
            reserved: Reserved::default(),
            origin_key: None,
            gas_payer_key: None,
            origin_address: None,
            transaction: None,
            tx_id: None,
            receipt: None,
        }
    }
}
