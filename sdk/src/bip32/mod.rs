//! BIP-32 hierarchical deterministic key derivation (spec.md §4.10), restricted to the
//! hardened account path VeChain wallets use: `m/44'/818'/0'/0/i`.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{Error, Result};
use crate::secp256k1::{add_mod_order, to_compressed_pubkey, PrivateKey};

type HmacSha512 = Hmac<Sha512>;

const HARDENED_OFFSET: u32 = 0x8000_0000;
const SEED_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// VeChain's BIP-44 coin type (818) under the standard `m/44'/<coin>'/0'/0/i` account path.
pub const VECHAIN_COIN_TYPE: u32 = 818;

/// An extended private key: the raw 32-byte key plus its 32-byte chain code.
#[derive(Clone)]
pub struct ExtendedKey {
    pub private_key: PrivateKey,
    pub chain_code: [u8; 32],
}

/// Derive the master extended key from a BIP-39 seed.
pub fn master_from_seed(seed: &[u8]) -> Result<ExtendedKey> {
    let mut mac = HmacSha512::new_from_slice(SEED_HMAC_KEY).expect("HMAC accepts any key length");
    mac.update(seed);
    let i = mac.finalize().into_bytes();

    let mut private_key = [0u8; 32];
    private_key.copy_from_slice(&i[0..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..64]);

    Ok(ExtendedKey {
        private_key: PrivateKey::from_bytes(private_key)?,
        chain_code,
    })
}

/// One hardened or normal child-key derivation step (`CKDpriv`).
pub fn derive_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let mut mac = HmacSha512::new_from_slice(&parent.chain_code).expect("HMAC accepts any key length");

    if index >= HARDENED_OFFSET {
        mac.update(&[0u8]);
        mac.update(&parent.private_key.0);
    } else {
        let compressed = to_compressed_pubkey(&parent.private_key)?;
        mac.update(&compressed);
    }
    mac.update(&index.to_be_bytes());

    let i = mac.finalize().into_bytes();
    let mut il = [0u8; 32];
    il.copy_from_slice(&i[0..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..64]);

    let child_key = add_mod_order(&il, &parent.private_key.0)?;

    Ok(ExtendedKey {
        private_key: PrivateKey::from_bytes(child_key)?,
        chain_code,
    })
}

/// The first 4 bytes of `RIPEMD160(SHA256(compressed_pubkey))`, identifying a key's parent
/// within its extended-key chain.
pub fn fingerprint(key: &PrivateKey) -> Result<[u8; 4]> {
    let compressed = to_compressed_pubkey(key)?;
    let sha = Sha256::digest(compressed);
    let ripemd = Ripemd160::digest(sha);
    let mut out = [0u8; 4];
    out.copy_from_slice(&ripemd[0..4]);
    Ok(out)
}

/// One path segment: an index, and whether it is hardened (denoted `'` in string form).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub index: u32,
    pub hardened: bool,
}

impl PathSegment {
    pub fn raw_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

/// Parse a derivation path like `m/44'/818'/0'/0/5`.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>> {
    let mut segments = path.split('/');
    let first = segments.next().ok_or_else(|| Error::InvalidPath(path.to_string()))?;
    if first != "m" {
        return Err(Error::InvalidPath(format!(
            "path must start with 'm': {path}"
        )));
    }
    segments
        .map(|segment| {
            let hardened = segment.ends_with('\'') || segment.ends_with('h');
            let digits = segment.trim_end_matches(['\'', 'h']);
            let index: u32 = digits
                .parse()
                .map_err(|_| Error::InvalidPath(format!("bad path segment: {segment}")))?;
            Ok(PathSegment { index, hardened })
        })
        .collect()
}

/// Derive the key at the given path from a master extended key.
pub fn derive_path(master: &ExtendedKey, path: &str) -> Result<ExtendedKey> {
    let segments = parse_path(path)?;
    let mut current = master.clone();
    for segment in segments {
        current = derive_child(&current, segment.raw_index())?;
    }
    Ok(current)
}

/// The standard VeChain wallet path for account index `i`: `m/44'/818'/0'/0/i`.
pub fn vechain_path(account_index: u32) -> String {
    format!("m/44'/{VECHAIN_COIN_TYPE}'/0'/0/{account_index}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    /// spec.md §8 S4.
    #[test]
    fn master_from_known_seed_matches_vector() {
        let seed = hex::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = master_from_seed(&seed).unwrap();
        assert_eq!(
            hex::to_hex(&master.private_key.0),
            "0xe8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::to_hex(&master.chain_code),
            "0x873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );

        let child = derive_child(&master, 0 | HARDENED_OFFSET).unwrap();
        assert_eq!(
            hex::to_hex(&child.private_key.0),
            "0xedb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
    }

    #[test]
    fn parses_hardened_and_normal_segments() {
        let segments = parse_path("m/44'/818'/0'/0/5").unwrap();
        assert_eq!(segments.len(), 4);
        assert!(segments[0].hardened);
        assert_eq!(segments[0].index, 44);
        assert!(!segments[3].hardened);
        assert_eq!(segments[3].index, 5);
    }

    #[test]
    fn vechain_path_uses_coin_type_818() {
        assert_eq!(vechain_path(0), "m/44'/818'/0'/0/0");
    }

    #[test]
    fn derive_path_is_deterministic() {
        let seed = hex::from_hex("000102030405060708090a0b0c0d0e0f").unwrap();
        let master = master_from_seed(&seed).unwrap();
        let a = derive_path(&master, &vechain_path(0)).unwrap();
        let b = derive_path(&master, &vechain_path(0)).unwrap();
        assert_eq!(a.private_key.0, b.private_key.0);
    }

    #[test]
    fn rejects_path_without_m_prefix() {
        assert!(parse_path("44'/0'/0/0").is_err());
    }
}
