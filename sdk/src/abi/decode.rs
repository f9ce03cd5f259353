//! ABI decoding (spec.md §4.10): the inverse of `encode`, plus event log decoding that
//! splits indexed topics from the data payload.

use super::token::Token;
use crate::address::Address;
use crate::error::{Error, Result};

const WORD: usize = 32;

/// A decode-time type tag: which [`Token`] shape a given slot of the payload should become.
/// Mirrors the Ethereum ABI type grammar: scalars, `bytes<N>`/`bytes`/`string`, `T[]`/`T[N]`,
/// and tuples.
#[derive(Debug, Clone)]
pub enum TokenKind {
    Address,
    Uint(u16),
    Int(u16),
    Bool,
    FixedBytes(u8),
    Bytes,
    String,
    Array(Box<TokenKind>),
    FixedArray(Box<TokenKind>, usize),
    Tuple(Vec<TokenKind>),
}

impl TokenKind {
    fn is_dynamic(&self) -> bool {
        match self {
            TokenKind::Bytes | TokenKind::String | TokenKind::Array(_) => true,
            TokenKind::FixedArray(inner, _) => inner.is_dynamic(),
            TokenKind::Tuple(kinds) => kinds.iter().any(TokenKind::is_dynamic),
            _ => false,
        }
    }

    fn static_words(&self) -> usize {
        match self {
            TokenKind::FixedArray(inner, n) => inner.static_words() * n,
            TokenKind::Tuple(kinds) => kinds.iter().map(TokenKind::static_words).sum(),
            _ => 1,
        }
    }
}

/// Decode `data` into one token per entry in `kinds`, in order.
pub fn decode(kinds: &[TokenKind], data: &[u8]) -> Result<Vec<Token>> {
    decode_sequence(kinds, data, "")
}

/// The shared head/tail algorithm: used for the top-level argument list, and recursively for
/// tuples and arrays, whose own elements sit at offsets relative to their own start.
fn decode_sequence(kinds: &[TokenKind], data: &[u8], path: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(kinds.len());
    let mut head_offset = 0usize;

    for (i, kind) in kinds.iter().enumerate() {
        let item_path = format!("{path}[{i}]");
        if kind.is_dynamic() {
            let offset = usize_from_word(&read_word(data, head_offset, &item_path)?)?;
            let tail = data.get(offset..).ok_or_else(|| Error::Encoding {
                path: item_path.clone(),
                detail: "dynamic offset exceeds payload length".into(),
            })?;
            tokens.push(decode_tail(kind, tail, &item_path)?);
            head_offset += WORD;
        } else {
            let words = kind.static_words();
            let slice = data
                .get(head_offset..head_offset + words * WORD)
                .ok_or_else(|| Error::Encoding {
                    path: item_path.clone(),
                    detail: "ABI payload truncated".into(),
                })?;
            tokens.push(decode_inline(kind, slice, &item_path)?);
            head_offset += words * WORD;
        }
    }

    Ok(tokens)
}

/// Decodes a static token from its inline slot (exactly `kind.static_words() * WORD` bytes).
fn decode_inline(kind: &TokenKind, slice: &[u8], path: &str) -> Result<Token> {
    match kind {
        TokenKind::Address => {
            let word = to_word(slice, path)?;
            Ok(Token::Address(Address::from_slice(&word[12..])?))
        }
        TokenKind::Uint(n) => Ok(Token::Uint(*n, to_word(slice, path)?)),
        TokenKind::Int(n) => Ok(Token::Int(*n, to_word(slice, path)?)),
        TokenKind::Bool => Ok(Token::Bool(to_word(slice, path)?[31] != 0)),
        TokenKind::FixedBytes(n) => Ok(Token::FixedBytes(*n, to_word(slice, path)?)),
        TokenKind::FixedArray(inner, count) => {
            let words = inner.static_words();
            let mut items = Vec::with_capacity(*count);
            for i in 0..*count {
                let chunk = slice
                    .get(i * words * WORD..(i + 1) * words * WORD)
                    .ok_or_else(|| Error::Encoding {
                        path: path.into(),
                        detail: "ABI payload truncated".into(),
                    })?;
                items.push(decode_inline(inner, chunk, &format!("{path}[{i}]"))?);
            }
            Ok(Token::FixedArray(items))
        }
        TokenKind::Tuple(kinds) => Ok(Token::Tuple(decode_sequence_inline(kinds, slice, path)?)),
        TokenKind::Bytes | TokenKind::String | TokenKind::Array(_) => unreachable!(
            "dynamic kinds are decoded through decode_tail, never decode_inline"
        ),
    }
}

/// Decodes a fixed run of static elements back to back, with no head/tail indirection
/// (used inside a static tuple's own inline slot).
fn decode_sequence_inline(kinds: &[TokenKind], slice: &[u8], path: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(kinds.len());
    let mut offset = 0usize;
    for (i, kind) in kinds.iter().enumerate() {
        let words = kind.static_words();
        let chunk = slice
            .get(offset..offset + words * WORD)
            .ok_or_else(|| Error::Encoding {
                path: path.into(),
                detail: "ABI payload truncated".into(),
            })?;
        tokens.push(decode_inline(kind, chunk, &format!("{path}[{i}]"))?);
        offset += words * WORD;
    }
    Ok(tokens)
}

/// Decodes the out-of-line content of a dynamic token, given the tail slice starting at its
/// offset.
fn decode_tail(kind: &TokenKind, tail: &[u8], path: &str) -> Result<Token> {
    match kind {
        TokenKind::Bytes => Ok(Token::Bytes(read_length_prefixed(tail, path)?)),
        TokenKind::String => {
            let raw = read_length_prefixed(tail, path)?;
            Ok(Token::String(String::from_utf8(raw).map_err(|e| {
                Error::Encoding {
                    path: path.into(),
                    detail: format!("invalid utf-8 in ABI string: {e}"),
                }
            })?))
        }
        TokenKind::Array(inner) => {
            let len = usize_from_word(&read_word(tail, 0, path)?)?;
            let kinds: Vec<TokenKind> = std::iter::repeat(*inner.clone()).take(len).collect();
            let items = decode_sequence(&kinds, &tail[WORD..], path)?;
            Ok(Token::Array(items))
        }
        TokenKind::FixedArray(inner, count) => {
            let kinds: Vec<TokenKind> = std::iter::repeat(*inner.clone()).take(*count).collect();
            let items = decode_sequence(&kinds, tail, path)?;
            Ok(Token::FixedArray(items))
        }
        TokenKind::Tuple(kinds) => {
            let items = decode_sequence(kinds, tail, path)?;
            Ok(Token::Tuple(items))
        }
        _ => unreachable!("static kinds are decoded through decode_inline, never decode_tail"),
    }
}

fn read_length_prefixed(tail: &[u8], path: &str) -> Result<Vec<u8>> {
    let len = usize_from_word(&read_word(tail, 0, path)?)?;
    tail.get(WORD..WORD + len)
        .map(|s| s.to_vec())
        .ok_or_else(|| Error::Encoding {
            path: path.into(),
            detail: "dynamic segment exceeds payload length".into(),
        })
}

fn to_word(slice: &[u8], path: &str) -> Result<[u8; 32]> {
    if slice.len() != WORD {
        return Err(Error::Encoding {
            path: path.into(),
            detail: "ABI payload truncated".into(),
        });
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(slice);
    Ok(word)
}

fn read_word(data: &[u8], offset: usize, path: &str) -> Result<[u8; 32]> {
    data.get(offset..offset + WORD)
        .map(|slice| {
            let mut word = [0u8; 32];
            word.copy_from_slice(slice);
            word
        })
        .ok_or_else(|| Error::Encoding {
            path: path.into(),
            detail: "ABI payload truncated".into(),
        })
}

fn usize_from_word(word: &[u8; 32]) -> Result<usize> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(Error::Encoding {
            path: "[offset/length]".into(),
            detail: "value exceeds usize range".into(),
        });
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(buf) as usize)
}

/// A decoded event log: indexed arguments come from `topics[1..]`, non-indexed arguments
/// are ABI-encoded in `data` (spec.md §4.10).
pub struct DecodedLog {
    pub topic0: [u8; 32],
    pub indexed: Vec<Token>,
    pub data: Vec<Token>,
}

/// Decode a log given which positions are indexed, matching the on-chain split between
/// `topics` and `data`.
pub fn decode_log(
    topics: &[[u8; 32]],
    data: &[u8],
    indexed_kinds: &[TokenKind],
    data_kinds: &[TokenKind],
) -> Result<DecodedLog> {
    let topic0 = *topics.first().ok_or_else(|| Error::Encoding {
        path: "topics".into(),
        detail: "log has no topic0".into(),
    })?;
    if topics.len() - 1 != indexed_kinds.len() {
        return Err(Error::Encoding {
            path: "topics".into(),
            detail: format!(
                "expected {} indexed topics, got {}",
                indexed_kinds.len(),
                topics.len() - 1
            ),
        });
    }
    let mut indexed = Vec::with_capacity(indexed_kinds.len());
    for (kind, topic) in indexed_kinds.iter().zip(&topics[1..]) {
        indexed.push(match kind {
            TokenKind::Address => Token::Address(Address::from_slice(&topic[12..])?),
            TokenKind::Uint(n) => Token::Uint(*n, *topic),
            TokenKind::Int(n) => Token::Int(*n, *topic),
            TokenKind::Bool => Token::Bool(topic[31] != 0),
            TokenKind::FixedBytes(n) => Token::FixedBytes(*n, *topic),
            TokenKind::Bytes
            | TokenKind::String
            | TokenKind::Array(_)
            | TokenKind::FixedArray(_, _)
            | TokenKind::Tuple(_) => {
                return Err(Error::Encoding {
                    path: "topics".into(),
                    detail: "dynamic types cannot be indexed directly; expect their hash".into(),
                })
            }
        });
    }
    let data_tokens = decode(data_kinds, data)?;
    Ok(DecodedLog {
        topic0,
        indexed,
        data: data_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode::encode;

    #[test]
    fn round_trips_static_tokens() {
        let tokens = vec![Token::Address(Address([0x22; 20])), Token::uint256_from_u64(7)];
        let encoded = encode(&tokens);
        let decoded = decode(&[TokenKind::Address, TokenKind::Uint(256)], &encoded).unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn round_trips_dynamic_bytes() {
        let tokens = vec![Token::Bytes(vec![9, 9, 9, 9, 9])];
        let encoded = encode(&tokens);
        let decoded = decode(&[TokenKind::Bytes], &encoded).unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn round_trips_dynamic_array() {
        let tokens = vec![Token::Array(vec![
            Token::uint256_from_u64(1),
            Token::uint256_from_u64(2),
            Token::uint256_from_u64(3),
        ])];
        let encoded = encode(&tokens);
        let decoded = decode(&[TokenKind::Array(Box::new(TokenKind::Uint(256)))], &encoded)
            .unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn round_trips_static_fixed_array() {
        let tokens = vec![Token::FixedArray(vec![
            Token::Address(Address([0x11; 20])),
            Token::Address(Address([0x22; 20])),
        ])];
        let encoded = encode(&tokens);
        let decoded = decode(
            &[TokenKind::FixedArray(Box::new(TokenKind::Address), 2)],
            &encoded,
        )
        .unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn round_trips_tuple_with_dynamic_field() {
        let tokens = vec![Token::Tuple(vec![
            Token::Address(Address([0x33; 20])),
            Token::Bytes(vec![7, 7]),
        ])];
        let encoded = encode(&tokens);
        let decoded = decode(
            &[TokenKind::Tuple(vec![TokenKind::Address, TokenKind::Bytes])],
            &encoded,
        )
        .unwrap();
        assert_eq!(decoded, tokens);
    }

    #[test]
    fn decodes_transfer_event_log() {
        // Transfer(address indexed from, address indexed to, uint256 value)
        let topic0 = [0xaa; 32];
        let mut from_topic = [0u8; 32];
        from_topic[12..].copy_from_slice(&[0x11u8; 20]);
        let mut to_topic = [0u8; 32];
        to_topic[12..].copy_from_slice(&[0x22u8; 20]);
        let data = encode(&[Token::uint256_from_u64(500)]);

        let log = decode_log(
            &[topic0, from_topic, to_topic],
            &data,
            &[TokenKind::Address, TokenKind::Address],
            &[TokenKind::Uint(256)],
        )
        .unwrap();

        assert_eq!(log.topic0, topic0);
        assert_eq!(log.indexed[0], Token::Address(Address([0x11; 20])));
        assert_eq!(log.indexed[1], Token::Address(Address([0x22; 20])));
        assert_eq!(log.data[0].uint256_to_u64().unwrap(), 500);
    }
}
