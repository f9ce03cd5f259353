//! The composable transaction pipeline (spec.md §4.7): build clauses, fill in chain
//! context, sign, optionally co-sign under VIP-191, broadcast, and await the receipt.

mod observer;
mod state;
mod steps;

use std::collections::HashSet;

pub use observer::{LoggingObserver, NoopObserver, Observer};
pub use state::PipelineState;
pub use steps::Step;

use crate::clause::Clause;
use crate::config::{NetworkConfig, PipelineOptions};
use crate::error::{Error, Result};
use crate::secp256k1::PrivateKey;
use crate::thor::ThorClient;
use crate::thor::types::Receipt;
use crate::tx::{Reserved, Transaction};

/// Runs the full pipeline for a set of clauses against a Thor node, end to end.
pub struct TransactionBuilder {
    state: PipelineState,
    network: NetworkConfig,
    options: PipelineOptions,
    skip: HashSet<Step>,
}

impl TransactionBuilder {
    pub fn new(clauses: Vec<Clause>, network: NetworkConfig, options: PipelineOptions) -> Self {
        TransactionBuilder {
            state: PipelineState::new(clauses),
            network,
            options,
            skip: HashSet::new(),
        }
    }

    pub fn origin(mut self, key: PrivateKey) -> Self {
        self.state.origin_key = Some(key);
        self
    }

    /// Enables VIP-191 two-party fee delegation with the given gas-payer key.
    pub fn delegated(mut self, gas_payer_key: PrivateKey) -> Self {
        self.state.gas_payer_key = Some(gas_payer_key);
        self.state.reserved = Reserved::delegated();
        self
    }

    pub fn depends_on(mut self, tx_id: [u8; 32]) -> Self {
        self.state.depends_on = Some(tx_id);
        self
    }

    pub fn gas_price_coef(mut self, coef: u8) -> Self {
        self.state.gas_price_coef = coef;
        self
    }

    /// Caller-chosen uniqueness salt (spec.md §3); overrides the default of 0.
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.state.nonce = nonce;
        self
    }

    /// Overrides `CalculateGas`'s intrinsic-gas computation (spec.md §4.6: "a user-supplied
    /// `gas` override wins").
    pub fn gas(mut self, gas: u64) -> Self {
        self.state.gas = Some(gas);
        self
    }

    /// Overrides `SetBlockRef`'s fetch from the node's best block.
    pub fn block_ref(mut self, block_ref: [u8; 8]) -> Self {
        self.state.block_ref = Some(block_ref);
        self
    }

    /// Skips the named steps during `run` (spec.md §4.6: "step order is fixed but
    /// individual steps may be skipped via a `skip` list"). The caller is responsible for
    /// having satisfied, by other means, whatever state a skipped step would have filled in.
    pub fn skip(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.skip.extend(steps);
        self
    }

    /// Runs `SetChainTag → SetBlockRef → SetExpiration → CalculateGas → Sign → CoSign →
    /// Broadcast → AwaitReceipt → DecodeReceipt`, reporting each step to `observer`. Steps
    /// named in `skip` are omitted entirely (no observer callbacks fire for them).
    pub async fn run(mut self, client: &ThorClient, observer: &dyn Observer) -> Result<PipelineOutcome> {
        let network = self.network.clone();
        let options = self.options.clone();
        let skip = self.skip.clone();

        if !skip.contains(&Step::SetChainTag) {
            run_step(observer, Step::SetChainTag, || {
                steps::set_chain_tag(&mut self.state, &network)
            })?;
        }

        if !skip.contains(&Step::SetBlockRef) {
            run_async_step(observer, Step::SetBlockRef, steps::set_block_ref(&mut self.state, client)).await?;
        }

        if !skip.contains(&Step::SetExpiration) {
            run_step(observer, Step::SetExpiration, || {
                steps::set_expiration(&mut self.state, &options)
            })?;
        }

        if !skip.contains(&Step::CalculateGas) {
            run_step(observer, Step::CalculateGas, || steps::calculate_gas(&mut self.state))?;
        }

        if !skip.contains(&Step::Sign) {
            run_step(observer, Step::Sign, || steps::sign(&mut self.state))?;
        }

        if !skip.contains(&Step::CoSign) {
            run_step(observer, Step::CoSign, || steps::co_sign(&mut self.state))?;
        }

        if !skip.contains(&Step::Broadcast) {
            run_async_step(observer, Step::Broadcast, steps::broadcast(&mut self.state, client)).await?;
        }

        if !skip.contains(&Step::AwaitReceipt) {
            run_async_step(
                observer,
                Step::AwaitReceipt,
                steps::await_receipt(&mut self.state, client, &options),
            )
            .await?;
        }

        if !skip.contains(&Step::DecodeReceipt) {
            run_step(observer, Step::DecodeReceipt, || {
                steps::decode_receipt(&mut self.state, &options)
            })?;
        }

        Ok(PipelineOutcome {
            transaction: self.state.transaction.ok_or(Error::MissingField { name: "transaction" })?,
            tx_id: self.state.tx_id.ok_or(Error::MissingField { name: "tx_id" })?,
            receipt: self.state.receipt,
        })
    }
}

fn run_step(observer: &dyn Observer, step: Step, f: impl FnOnce() -> Result<()>) -> Result<()> {
    observer.before_step(&step);
    match f() {
        Ok(()) => {
            observer.after_step(&step);
            Ok(())
        }
        Err(e) => {
            observer.on_error(&step, &e);
            Err(e)
        }
    }
}

async fn run_async_step(
    observer: &dyn Observer,
    step: Step,
    fut: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    observer.before_step(&step);
    match fut.await {
        Ok(()) => {
            observer.after_step(&step);
            Ok(())
        }
        Err(e) => {
            observer.on_error(&step, &e);
            Err(e)
        }
    }
}

/// The result of a pipeline run: the signed transaction and its id, plus the receipt if
/// `AwaitReceipt` ran (a caller that skips it gets `None` here rather than a panic).
pub struct PipelineOutcome {
    pub transaction: Transaction,
    pub tx_id: [u8; 32],
    pub receipt: Option<Receipt>,
}
