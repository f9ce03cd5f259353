//! Ethereum-ABI-compatible encoder/decoder (spec.md §4.9): function call data, return
//! values and event logs, plus selector derivation.

mod decode;
mod encode;
mod selector;
mod token;

pub use decode::{decode, decode_log, DecodedLog, TokenKind};
pub use encode::{encode, encode_with_selector};
pub use selector::{event_topic, function_selector};
pub use token::Token;
