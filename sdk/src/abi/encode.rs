//! ABI encoding (spec.md §4.10): fixed 32-byte words in a head/tail layout, with dynamic
//! types (`bytes`, `string`, dynamic arrays, and any tuple/fixed-array containing one of
//! those) written out-of-line behind a 32-byte offset in the head.

use super::token::Token;

const WORD: usize = 32;

/// Encode a sequence of tokens into an ABI call/return payload.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}

/// Prefix `selector` (4 bytes) to an encoded argument list, as `call_data` does in
/// spec.md §4.10.
pub fn encode_with_selector(selector: [u8; 4], tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + tokens.len() * WORD);
    out.extend_from_slice(&selector);
    out.extend(encode(tokens));
    out
}

/// The shared head/tail algorithm: used for the top-level argument list, and recursively for
/// tuples and arrays, whose own elements get the same treatment relative to their own start.
fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let head_size: usize = tokens
        .iter()
        .map(|t| if t.is_dynamic() { WORD } else { t.static_words() * WORD })
        .sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend_from_slice(&word_from_usize(offset));
            tail.extend(encode_tail(token));
        } else {
            head.extend(encode_inline(token));
        }
    }

    head.extend(tail);
    head
}

/// Encodes a static token inline, in place, with no offset indirection.
fn encode_inline(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(addr) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(&addr.0);
            word.to_vec()
        }
        Token::Uint(_, bytes) | Token::Int(_, bytes) => bytes.to_vec(),
        Token::Bool(b) => {
            let mut word = [0u8; 32];
            word[31] = if *b { 1 } else { 0 };
            word.to_vec()
        }
        Token::FixedBytes(_, bytes) => bytes.to_vec(),
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
        Token::Bytes(_) | Token::String(_) | Token::Array(_) => {
            unreachable!("dynamic tokens use encode_tail")
        }
    }
}

/// Encodes the out-of-line content of a dynamic token.
fn encode_tail(token: &Token) -> Vec<u8> {
    match token {
        Token::Bytes(b) => length_prefixed(b),
        Token::String(s) => length_prefixed(s.as_bytes()),
        Token::Array(items) => {
            let mut out = word_from_usize(items.len()).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        Token::FixedArray(items) | Token::Tuple(items) => encode_sequence(items),
        _ => unreachable!("static tokens use encode_inline"),
    }
}

fn length_prefixed(raw: &[u8]) -> Vec<u8> {
    let mut out = word_from_usize(raw.len()).to_vec();
    out.extend_from_slice(raw);
    let padding = (WORD - (raw.len() % WORD)) % WORD;
    out.extend(std::iter::repeat(0u8).take(padding));
    out
}

fn word_from_usize(n: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(n as u64).to_be_bytes());
    word
}
