//! Typed RLP Kinds (spec.md §4.4), modeled as a closed sum type per spec.md §9's redesign
//! flag — a sealed `enum` with a match arm per kind, not open trait-object dispatch.

use super::primitives::Item;
use crate::error::{Error, Result};

/// A typed, bounded RLP codec for one leaf value.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// Non-negative integer, big-endian minimal representation; zero encodes to empty.
    Numeric { max_bytes: Option<usize> },
    /// Variable-length byte string.
    HexBlob,
    /// Exactly `bytes` long; rejects shorter or longer inputs.
    FixedHexBlob { bytes: usize },
    /// Strips leading zero bytes on encode; left-pads back to `bytes` on decode.
    CompactFixedHexBlob { bytes: usize },
    /// Empty maps to empty; otherwise behaves like `FixedHexBlob`.
    OptionalFixedHexBlob { bytes: usize },
}

impl Kind {
    pub fn numeric(max_bytes: Option<usize>) -> Self {
        Kind::Numeric { max_bytes }
    }

    pub fn fixed(bytes: usize) -> Self {
        Kind::FixedHexBlob { bytes }
    }

    pub fn compact_fixed(bytes: usize) -> Self {
        Kind::CompactFixedHexBlob { bytes }
    }

    pub fn optional_fixed(bytes: usize) -> Self {
        Kind::OptionalFixedHexBlob { bytes }
    }

    /// Encode `value` (already-canonical bytes) into an RLP [`Item`], validating bounds and
    /// attributing failures to `path`.
    pub fn encode(&self, value: &[u8], path: &str) -> Result<Item> {
        match self {
            Kind::Numeric { max_bytes } => {
                let trimmed = trim_leading_zeros(value);
                if let Some(max) = max_bytes {
                    if trimmed.len() > *max {
                        return Err(err(path, format!(
                            "numeric value occupies {} bytes, exceeds max_bytes={}",
                            trimmed.len(),
                            max
                        )));
                    }
                }
                Ok(Item::bytes(trimmed.to_vec()))
            }
            Kind::HexBlob => Ok(Item::bytes(value.to_vec())),
            Kind::FixedHexBlob { bytes } => {
                if value.len() != *bytes {
                    return Err(err(
                        path,
                        format!("expected exactly {} bytes, got {}", bytes, value.len()),
                    ));
                }
                Ok(Item::bytes(value.to_vec()))
            }
            Kind::CompactFixedHexBlob { bytes } => {
                if value.len() != *bytes {
                    return Err(err(
                        path,
                        format!("expected exactly {} bytes, got {}", bytes, value.len()),
                    ));
                }
                Ok(Item::bytes(trim_leading_zeros(value).to_vec()))
            }
            Kind::OptionalFixedHexBlob { bytes } => {
                if value.is_empty() {
                    return Ok(Item::bytes(Vec::new()));
                }
                if value.len() != *bytes {
                    return Err(err(
                        path,
                        format!("expected 0 or {} bytes, got {}", bytes, value.len()),
                    ));
                }
                Ok(Item::bytes(value.to_vec()))
            }
        }
    }

    /// Decode an RLP [`Item`] back into canonical bytes for this kind.
    pub fn decode(&self, item: &Item, path: &str) -> Result<Vec<u8>> {
        let raw = item
            .as_bytes()
            .map_err(|e| err(path, e.to_string()))?;
        match self {
            Kind::Numeric { max_bytes } => {
                if raw.first() == Some(&0) {
                    return Err(err(path, "non-canonical numeric encoding (leading zero)".into()));
                }
                if let Some(max) = max_bytes {
                    if raw.len() > *max {
                        return Err(err(
                            path,
                            format!("numeric value occupies {} bytes, exceeds max_bytes={}", raw.len(), max),
                        ));
                    }
                }
                Ok(raw.to_vec())
            }
            Kind::HexBlob => Ok(raw.to_vec()),
            Kind::FixedHexBlob { bytes } => {
                if raw.len() != *bytes {
                    return Err(err(
                        path,
                        format!("expected exactly {} bytes, got {}", bytes, raw.len()),
                    ));
                }
                Ok(raw.to_vec())
            }
            Kind::CompactFixedHexBlob { bytes } => {
                if raw.len() > *bytes {
                    return Err(err(
                        path,
                        format!("compact value occupies {} bytes, exceeds {}", raw.len(), bytes),
                    ));
                }
                let mut out = vec![0u8; *bytes];
                out[*bytes - raw.len()..].copy_from_slice(raw);
                Ok(out)
            }
            Kind::OptionalFixedHexBlob { bytes } => {
                if raw.is_empty() {
                    return Ok(Vec::new());
                }
                if raw.len() != *bytes {
                    return Err(err(
                        path,
                        format!("expected 0 or {} bytes, got {}", bytes, raw.len()),
                    ));
                }
                Ok(raw.to_vec())
            }
        }
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first_nonzero = bytes.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(i) => &bytes[i..],
        None => &[],
    }
}

fn err(path: &str, detail: String) -> Error {
    Error::Encoding {
        path: path.to_string(),
        detail,
    }
}

/// Encode an unsigned integer (`u64`) as canonical minimal big-endian bytes.
pub fn encode_u64(n: u64) -> Vec<u8> {
    trim_leading_zeros(&n.to_be_bytes()).to_vec()
}

/// Decode canonical minimal big-endian bytes back into a `u64`.
pub fn decode_u64(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(Error::Rlp("numeric value too large for u64".into()));
    }
    let mut buf = [0u8; 8];
    buf[8 - bytes.len()..].copy_from_slice(bytes);
    Ok(u64::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_zero_encodes_to_empty() {
        let kind = Kind::numeric(None);
        let item = kind.encode(&[], "n").unwrap();
        assert_eq!(item, Item::bytes(Vec::<u8>::new()));
    }

    #[test]
    fn numeric_strips_leading_zeros() {
        let kind = Kind::numeric(None);
        let item = kind.encode(&[0, 0, 1, 2], "n").unwrap();
        assert_eq!(item, Item::bytes(vec![1, 2]));
    }

    #[test]
    fn numeric_rejects_over_max_bytes() {
        let kind = Kind::numeric(Some(1));
        assert!(kind.encode(&[1, 2], "n").is_err());
    }

    #[test]
    fn fixed_hex_blob_rejects_wrong_length() {
        let kind = Kind::fixed(20);
        assert!(kind.encode(&[0u8; 19], "addr").is_err());
        assert!(kind.encode(&[0u8; 20], "addr").is_ok());
    }

    #[test]
    fn compact_fixed_round_trips_block_ref() {
        let kind = Kind::compact_fixed(8);
        let value = [0, 0, 0, 0, 1, 2, 3, 4];
        let item = kind.encode(&value, "block_ref").unwrap();
        assert_eq!(item, Item::bytes(vec![1, 2, 3, 4]));
        let decoded = kind.decode(&item, "block_ref").unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn optional_fixed_hex_blob_accepts_empty() {
        let kind = Kind::optional_fixed(32);
        let item = kind.encode(&[], "depends_on").unwrap();
        assert_eq!(item, Item::bytes(Vec::<u8>::new()));
        assert_eq!(kind.decode(&item, "depends_on").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn u64_round_trip() {
        assert_eq!(decode_u64(&encode_u64(0)).unwrap(), 0);
        assert_eq!(decode_u64(&encode_u64(300)).unwrap(), 300);
        assert_eq!(encode_u64(0), Vec::<u8>::new());
    }
}
