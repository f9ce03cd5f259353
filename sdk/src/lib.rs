//! A client-side SDK for constructing, signing, encoding, decoding and submitting
//! transactions on the VeChainThor blockchain.
//!
//! The RLP codec in [`rlp`] is this crate's core, hand-rolled engine; everything else —
//! clauses, the dual transaction model, the signing pipeline, the Thor REST client, key
//! derivation and keystores — is built on top of it.

pub mod abi;
pub mod address;
pub mod bip32;
pub mod bip39;
pub mod clause;
pub mod config;
pub mod error;
pub mod hash;
pub mod hex;
pub mod keystore;
pub mod pipeline;
pub mod rlp;
pub mod secp256k1;
pub mod thor;
pub mod tx;

pub use address::Address;
pub use config::{NetworkConfig, PipelineOptions};
pub use error::{Error, Result};
pub use secp256k1::PrivateKey;
pub use tx::Transaction;
