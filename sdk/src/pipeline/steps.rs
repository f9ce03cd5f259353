//! The pipeline's ordered steps (spec.md §4.7): `SetChainTag → SetBlockRef → SetExpiration →
//! CalculateGas → Sign → CoSign → Broadcast → AwaitReceipt → DecodeReceipt`.
//!
//! Each step is a plain function over [`PipelineState`] — a closed list, not an open plugin
//! registry, per spec.md §9's redesign flag.

use crate::address::Address;
use crate::config::{NetworkConfig, PipelineOptions};
use crate::error::{Error, Result};
use crate::hash::blake2b256;
use crate::secp256k1;
use crate::thor::ThorClient;
use crate::tx::{intrinsic_gas, LegacyTx, Transaction};

use super::state::PipelineState;

/// A single named pipeline step. Listed here, not dynamically discovered, so a reader can
/// see a transaction's entire lifecycle in one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    SetChainTag,
    SetBlockRef,
    SetExpiration,
    CalculateGas,
    Sign,
    CoSign,
    Broadcast,
    AwaitReceipt,
    DecodeReceipt,
}

pub fn set_chain_tag(state: &mut PipelineState, network: &NetworkConfig) -> Result<()> {
    state.chain_tag = Some(network.chain_tag);
    Ok(())
}

/// Fetches the current best block's id and takes its first 8 bytes as `block_ref`, unless
/// the caller already supplied one via `TransactionBuilder::block_ref` (spec.md §4.6:
/// "a user-supplied `gas` override wins" applies equally to the other explicit setters).
pub async fn set_block_ref(state: &mut PipelineState, client: &ThorClient) -> Result<()> {
    if state.block_ref.is_some() {
        return Ok(());
    }
    let block = client
        .get_block("best")
        .await?
        .ok_or(Error::NotFound)?;
    let id_bytes = crate::hex::from_hex(&block.id)?;
    if id_bytes.len() != 32 {
        return Err(Error::Network(format!(
            "best block id has {} bytes, expected 32",
            id_bytes.len()
        )));
    }
    let mut block_ref = [0u8; 8];
    block_ref.copy_from_slice(&id_bytes[0..8]);
    state.block_ref = Some(block_ref);
    Ok(())
}

pub fn set_expiration(state: &mut PipelineState, options: &PipelineOptions) -> Result<()> {
    state.expiration = Some(options.expiration);
    Ok(())
}

/// Computes intrinsic gas from the clause list, unless the caller already supplied a `gas`
/// override via `TransactionBuilder::gas` (spec.md §4.6: "a user-supplied `gas` override
/// wins").
pub fn calculate_gas(state: &mut PipelineState) -> Result<()> {
    if state.gas.is_none() {
        state.gas = Some(intrinsic_gas(&state.clauses));
    }
    Ok(())
}

fn require<T: Copy>(value: Option<T>, name: &'static str) -> Result<T> {
    value.ok_or(Error::MissingField { name })
}

fn build_unsigned_legacy(state: &PipelineState) -> Result<LegacyTx> {
    Ok(LegacyTx {
        chain_tag: require(state.chain_tag, "chain_tag")?,
        block_ref: require(state.block_ref, "block_ref")?,
        expiration: require(state.expiration, "expiration")?,
        clauses: state.clauses.clone(),
        gas_price_coef: state.gas_price_coef,
        gas: require(state.gas, "gas")?,
        depends_on: state.depends_on,
        nonce: state.nonce,
        reserved: state.reserved.clone(),
        signature: None,
    })
}

/// Signs the unsigned body with the origin key, setting `transaction` and `tx_id`.
pub fn sign(state: &mut PipelineState) -> Result<()> {
    let key = state
        .origin_key
        .as_ref()
        .ok_or(Error::MissingField { name: "origin_key" })?;
    let unsigned = build_unsigned_legacy(state)?;
    let tx = Transaction::Legacy(unsigned);
    let signing_hash = tx.signing_hash();
    let signature = secp256k1::sign(&signing_hash, key)?;

    let pubkey = secp256k1::to_pubkey(key)?;
    let origin = Address::from_pubkey(&pubkey);
    state.origin_address = Some(origin);

    let mut tx = tx;
    if tx.is_delegated() {
        // the gas payer's signature is appended in CoSign; store the origin half for now.
        tx.set_signature(signature.to_vec());
    } else {
        tx.set_signature(signature.to_vec());
        state.tx_id = Some(tx.id(origin));
    }
    state.transaction = Some(tx);
    Ok(())
}

/// For VIP-191 delegated transactions: the gas payer signs
/// `blake2b256(signing_hash ‖ origin)` and their signature is appended to the origin's.
pub fn co_sign(state: &mut PipelineState) -> Result<()> {
    let tx = state
        .transaction
        .as_mut()
        .ok_or(Error::MissingField { name: "transaction" })?;
    if !tx.is_delegated() {
        return Ok(());
    }
    // Already carries both signatures (origin 65B + gas payer 65B) - pass through so a
    // repeated CoSign run doesn't append a second gas-payer signature.
    if tx.signature().map(|s| s.len()) == Some(130) {
        return Ok(());
    }
    let gas_payer_key = state
        .gas_payer_key
        .as_ref()
        .ok_or(Error::MissingGasPayer)?;
    let origin = state
        .origin_address
        .ok_or(Error::MissingField { name: "origin_address" })?;

    let signing_hash = tx.signing_hash();
    let mut preimage = Vec::with_capacity(52);
    preimage.extend_from_slice(&signing_hash);
    preimage.extend_from_slice(&origin.0);
    let gas_payer_message = blake2b256(&preimage);

    let gas_payer_sig = secp256k1::sign(&gas_payer_message, gas_payer_key)?;
    let origin_sig = tx.signature().ok_or(Error::MissingField { name: "signature" })?.to_vec();

    let mut combined = origin_sig;
    combined.extend_from_slice(&gas_payer_sig);
    tx.set_signature(combined);

    state.tx_id = Some(tx.id(origin));
    Ok(())
}

pub async fn broadcast(state: &mut PipelineState, client: &ThorClient) -> Result<()> {
    let tx = state
        .transaction
        .as_ref()
        .ok_or(Error::MissingField { name: "transaction" })?;
    let raw = tx.encode_signed()?;
    let id = client.submit_transaction(&raw).await?;
    state.tx_id = Some(id);
    Ok(())
}

pub async fn await_receipt(state: &mut PipelineState, client: &ThorClient, options: &PipelineOptions) -> Result<()> {
    let tx_id = state.tx_id.ok_or(Error::MissingField { name: "tx_id" })?;
    let deadline = std::time::Duration::from_millis(options.timeout_ms);
    let poll_interval = std::time::Duration::from_millis(options.poll_interval_ms);
    let start = tokio::time::Instant::now();

    loop {
        if let Some(receipt) = client.get_receipt(tx_id).await? {
            state.receipt = Some(receipt);
            return Ok(());
        }
        if start.elapsed() >= deadline {
            return Err(Error::Timeout);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

pub fn decode_receipt(state: &mut PipelineState, options: &PipelineOptions) -> Result<()> {
    let receipt = state
        .receipt
        .as_ref()
        .ok_or(Error::MissingField { name: "receipt" })?;
    if options.check_revert && receipt.reverted {
        let vm_error = receipt
            .outputs
            .first()
            .map(|o| o.vm_error.clone())
            .unwrap_or_default();
        return Err(Error::Reverted(vm_error));
    }
    Ok(())
}
