//! Network configuration and pipeline defaults.
//!
//! No configuration lives in process-wide mutable state (spec.md §9): every top-level
//! entry point takes a [`NetworkConfig`] or [`PipelineOptions`] by value.

/// Chain tag for VeChain's three well-known networks (spec.md §6).
pub const MAINNET_CHAIN_TAG: u8 = 0x4a;
pub const TESTNET_CHAIN_TAG: u8 = 0x27;
pub const SOLO_CHAIN_TAG: u8 = 0xf6;

const MAINNET_NODE_URL: &str = "https://mainnet.vechain.org";
const TESTNET_NODE_URL: &str = "https://testnet.vechain.org";
const SOLO_NODE_URL: &str = "http://localhost:8669";

/// The network a pipeline targets: its chain tag and the Thor node to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_tag: u8,
    pub node_url: String,
}

impl NetworkConfig {
    pub fn mainnet() -> Self {
        Self {
            chain_tag: MAINNET_CHAIN_TAG,
            node_url: MAINNET_NODE_URL.to_string(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            chain_tag: TESTNET_CHAIN_TAG,
            node_url: TESTNET_NODE_URL.to_string(),
        }
    }

    pub fn solo() -> Self {
        Self {
            chain_tag: SOLO_CHAIN_TAG,
            node_url: SOLO_NODE_URL.to_string(),
        }
    }

    pub fn custom(chain_tag: u8, node_url: impl Into<String>) -> Self {
        Self {
            chain_tag,
            node_url: node_url.into(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

/// Defaults referenced throughout the pipeline (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Blocks after `block_ref` during which the transaction remains includable.
    pub expiration: u32,
    /// Receipt poll interval, in milliseconds.
    pub poll_interval_ms: u64,
    /// Overall `AwaitReceipt` timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Whether `DecodeReceipt` should fail on `receipt.reverted`.
    pub check_revert: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            expiration: 32,
            poll_interval_ms: 1_000,
            timeout_ms: 30_000,
            check_revert: true,
        }
    }
}
