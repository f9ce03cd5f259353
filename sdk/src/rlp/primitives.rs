//! Canonical RLP primitives (Ethereum Yellow Paper §Appendix B), hand-rolled: this is the
//! crate's "core, educative part" (spec.md §1), and the bespoke `Kind`s layered on top
//! (`CompactFixedHexBlob`, `OptionalFixedHexBlob`) have no equivalent in general-purpose RLP
//! crates, so there is nothing upstream to delegate to.

use crate::error::{Error, Result};

/// An RLP item is either a byte string or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Bytes(Vec<u8>),
    List(Vec<Item>),
}

impl Item {
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Item::Bytes(b.into())
    }

    pub fn list(items: impl Into<Vec<Item>>) -> Self {
        Item::List(items.into())
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match self {
            Item::Bytes(b) => Ok(b),
            Item::List(_) => Err(Error::Rlp("expected byte string, found list".into())),
        }
    }

    pub fn as_list(&self) -> Result<&[Item]> {
        match self {
            Item::List(l) => Ok(l),
            Item::Bytes(_) => Err(Error::Rlp("expected list, found byte string".into())),
        }
    }

    /// Encode this item to canonical RLP.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Item::Bytes(b) => encode_bytes(b),
            Item::List(items) => {
                let mut body = Vec::new();
                for item in items {
                    body.extend(item.encode());
                }
                encode_list_header(body.len())
                    .into_iter()
                    .chain(body)
                    .collect()
            }
        }
    }

    /// Decode a single item from `data`, requiring the entire slice to be consumed.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (item, rest) = decode_one(data)?;
        if !rest.is_empty() {
            return Err(Error::Rlp("trailing bytes after RLP item".into()));
        }
        Ok(item)
    }
}

/// Encode a single canonical byte string: `0x00`..`0x7f` encode to themselves; longer strings
/// get a length-prefixed header.
pub fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return vec![bytes[0]];
    }
    let mut out = encode_header(0x80, bytes.len());
    out.extend_from_slice(bytes);
    out
}

fn encode_list_header(len: usize) -> Vec<u8> {
    encode_header(0xc0, len)
}

fn encode_header(base: u8, len: usize) -> Vec<u8> {
    if len < 56 {
        vec![base + len as u8]
    } else {
        let len_bytes = minimal_be_bytes(len as u64);
        let mut out = vec![base + 55 + len_bytes.len() as u8];
        out.extend_from_slice(&len_bytes);
        out
    }
}

fn minimal_be_bytes(n: u64) -> Vec<u8> {
    let full = n.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(i) => full[i..].to_vec(),
        None => Vec::new(),
    }
}

/// Decode one item and return it along with the unconsumed remainder of `data`.
fn decode_one(data: &[u8]) -> Result<(Item, &[u8])> {
    let prefix = *data
        .first()
        .ok_or_else(|| Error::Rlp("unexpected end of input".into()))?;

    match prefix {
        0x00..=0x7f => Ok((Item::Bytes(vec![prefix]), &data[1..])),
        0x80..=0xb7 => {
            let len = (prefix - 0x80) as usize;
            let (body, rest) = split_at_checked(&data[1..], len)?;
            check_canonical_single_byte(body)?;
            Ok((Item::Bytes(body.to_vec()), rest))
        }
        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            let (len_bytes, rest) = split_at_checked(&data[1..], len_of_len)?;
            let len = decode_length(len_bytes)?;
            if len < 56 {
                return Err(Error::Rlp("non-canonical length encoding".into()));
            }
            let (body, rest) = split_at_checked(rest, len)?;
            Ok((Item::Bytes(body.to_vec()), rest))
        }
        0xc0..=0xf7 => {
            let len = (prefix - 0xc0) as usize;
            let (body, rest) = split_at_checked(&data[1..], len)?;
            Ok((Item::List(decode_all(body)?), rest))
        }
        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            let (len_bytes, rest) = split_at_checked(&data[1..], len_of_len)?;
            let len = decode_length(len_bytes)?;
            if len < 56 {
                return Err(Error::Rlp("non-canonical length encoding".into()));
            }
            let (body, rest) = split_at_checked(rest, len)?;
            Ok((Item::List(decode_all(body)?), rest))
        }
    }
}

fn decode_all(mut data: &[u8]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    while !data.is_empty() {
        let (item, rest) = decode_one(data)?;
        items.push(item);
        data = rest;
    }
    Ok(items)
}

fn split_at_checked(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(Error::Rlp("length prefix exceeds remaining input".into()));
    }
    Ok(data.split_at(len))
}

fn decode_length(bytes: &[u8]) -> Result<usize> {
    if bytes.first() == Some(&0) {
        return Err(Error::Rlp("non-canonical length prefix".into()));
    }
    let mut buf = [0u8; 8];
    if bytes.len() > 8 {
        return Err(Error::Rlp("length prefix too large".into()));
    }
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf) as usize)
}

fn check_canonical_single_byte(body: &[u8]) -> Result<()> {
    if body.len() == 1 && body[0] < 0x80 {
        return Err(Error::Rlp(
            "single byte below 0x80 must be encoded without a length prefix".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_empty_string_as_0x80() {
        assert_eq!(encode_bytes(&[]), vec![0x80]);
    }

    #[test]
    fn encodes_single_small_byte_as_itself() {
        assert_eq!(encode_bytes(&[0x01]), vec![0x01]);
    }

    #[test]
    fn encodes_single_byte_above_0x7f_with_header() {
        assert_eq!(encode_bytes(&[0x80]), vec![0x81, 0x80]);
    }

    #[test]
    fn round_trips_nested_list() {
        let item = Item::list(vec![
            Item::bytes(vec![1, 2, 3]),
            Item::list(vec![Item::bytes(vec![]), Item::bytes(b"vechain".to_vec())]),
        ]);
        let encoded = item.encode();
        let decoded = Item::decode(&encoded).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn round_trips_long_string() {
        let data = vec![0xab; 100];
        let item = Item::bytes(data.clone());
        let decoded = Item::decode(&item.encode()).unwrap();
        assert_eq!(decoded.as_bytes().unwrap(), &data[..]);
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut encoded = Item::bytes(vec![1, 2]).encode();
        encoded.push(0xff);
        assert!(Item::decode(&encoded).is_err());
    }
}
