//! The crate's closed error taxonomy (spec §7).
//!
//! Every fallible entry point returns `Result<T, Error>`; there is no separate
//! panicking/"bang" surface in the library — callers who want that reach for `?` or
//! `.expect()` themselves.

use thiserror::Error;

/// All errors the SDK can produce, grouped the way spec.md §7 groups them.
#[derive(Debug, Error)]
pub enum Error {
    // ---- InvalidInput ----
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("invalid amount")]
    InvalidAmount,
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),
    #[error("invalid word count: {0}")]
    InvalidWordCount(usize),
    #[error("invalid entropy length: {0} bits")]
    InvalidEntropyLength(usize),
    #[error("invalid checksum")]
    InvalidChecksum,
    #[error("invalid word: {0}")]
    InvalidWord(String),

    // ---- Encoding ----
    #[error("encoding error at {path}: {detail}")]
    Encoding { path: String, detail: String },
    #[error("malformed RLP: {0}")]
    Rlp(String),

    // ---- Crypto ----
    #[error("signature error: {0}")]
    SignatureError(String),
    #[error("invalid password")]
    InvalidPassword,
    #[error("keystore error: {0}")]
    KeystoreError(String),

    // ---- Pipeline / State ----
    #[error("missing field: {name}")]
    MissingField { name: &'static str },
    #[error("VIP-191 fee delegation is enabled but no gas payer key was supplied")]
    MissingGasPayer,
    #[error("transaction is already signed")]
    AlreadySigned,

    // ---- Network / Node ----
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,

    // ---- Execution ----
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("timed out waiting for receipt")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidHex(e.to_string())
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::SignatureError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Encoding {
            path: "<json>".to_string(),
            detail: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        log::error!("request failed: {:?}", e);
        Error::Network(e.to_string())
    }
}
