//! ABI value types (spec.md §4.10): address, uint<N>/int<N>, bool, bytes<N>/bytes, string,
//! arrays (`T[]` / `T[N]`) and tuples, exactly the type set the Ethereum ABI spec defines.

use crate::address::Address;
use crate::error::{Error, Result};

/// One decoded or to-be-encoded ABI value.
///
/// Fixed-width integers and `bytesN` carry their width alongside a 32-byte word: `Uint`/`Int`
/// right-align the value in the word (as the ABI does for any N up to 256), `FixedBytes`
/// left-aligns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(u16, [u8; 32]),
    Int(u16, [u8; 32]),
    Bool(bool),
    FixedBytes(u8, [u8; 32]),
    Bytes(Vec<u8>),
    String(String),
    /// Dynamic array, `T[]`.
    Array(Vec<Token>),
    /// Fixed-size array, `T[N]`.
    FixedArray(Vec<Token>),
    /// Tuple / struct.
    Tuple(Vec<Token>),
}

impl Token {
    pub fn uint256_from_u64(n: u64) -> Self {
        let mut buf = [0u8; 32];
        buf[24..].copy_from_slice(&n.to_be_bytes());
        Token::Uint(256, buf)
    }

    pub fn uint256_to_u64(&self) -> Result<u64> {
        match self {
            Token::Uint(_, bytes) => {
                if bytes[..24].iter().any(|&b| b != 0) {
                    return Err(Error::Encoding {
                        path: "uint256".into(),
                        detail: "value exceeds u64 range".into(),
                    });
                }
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[24..]);
                Ok(u64::from_be_bytes(buf))
            }
            other => Err(Error::Encoding {
                path: "uint256".into(),
                detail: format!("expected Uint, found {other:?}"),
            }),
        }
    }

    /// Whether this value is dynamic and therefore encoded out-of-line with a head/tail
    /// offset (spec.md §4.10): `bytes`, `string`, `T[]`, plus any `T[N]`/tuple that contains
    /// a dynamic component.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Token::Bytes(_) | Token::String(_) | Token::Array(_) => true,
            Token::FixedArray(items) | Token::Tuple(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    /// Number of 32-byte words this token occupies inline when static. Only meaningful when
    /// `is_dynamic()` is false.
    pub(super) fn static_words(&self) -> usize {
        match self {
            Token::FixedArray(items) | Token::Tuple(items) => {
                items.iter().map(Token::static_words).sum()
            }
            _ => 1,
        }
    }
}
