//! SECP256K1 key generation, recoverable signing and recovery (spec.md §4.3).

use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// secp256k1 group order, `n`.
const ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
    0x41, 0x41,
];
/// `n / 2`, the upper bound of a low-s signature.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
    0x20, 0xa0,
];

/// A raw 32-byte private key, zeroized on drop (spec.md §5 holder responsibility).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

impl PrivateKey {
    /// Generate a private key uniform in `[1, n-1]`.
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let sk = SecretKey::new(&mut OsRng);
        let _ = secp; // constructed only to mirror the sign/verify API surface
        Self(sk.secret_bytes())
    }

    /// Rejects zero and values `>= n`.
    pub fn is_valid(&self) -> bool {
        self.0 != [0u8; 32] && self.0 < ORDER
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let key = Self(bytes);
        if key.is_valid() {
            Ok(key)
        } else {
            Err(Error::InvalidPrivateKey)
        }
    }

    fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.0).map_err(|_| Error::InvalidPrivateKey)
    }
}

/// `x‖y`, the 64-byte uncompressed public key body with no `0x04` prefix.
pub fn to_pubkey(key: &PrivateKey) -> Result<[u8; 64]> {
    let secp = Secp256k1::new();
    let sk = key.secret_key()?;
    let pk = PublicKey::from_secret_key(&secp, &sk);
    let uncompressed = pk.serialize_uncompressed();
    let mut out = [0u8; 64];
    out.copy_from_slice(&uncompressed[1..]);
    Ok(out)
}

/// The 33-byte SEC1-compressed public key, used by BIP-32 derivation.
pub fn to_compressed_pubkey(key: &PrivateKey) -> Result<[u8; 33]> {
    let secp = Secp256k1::new();
    let sk = key.secret_key()?;
    let pk = PublicKey::from_secret_key(&secp, &sk);
    Ok(pk.serialize())
}

/// Add two secp256k1 scalars modulo the group order `n` (BIP-32 `CKDpriv`).
pub fn add_mod_order(a: &[u8; 32], b: &[u8; 32]) -> Result<[u8; 32]> {
    let sk_a = SecretKey::from_slice(a).map_err(|_| Error::InvalidPrivateKey)?;
    let tweak = secp256k1::Scalar::from_be_bytes(*b).map_err(|_| Error::InvalidPrivateKey)?;
    let sum = sk_a
        .add_tweak(&tweak)
        .map_err(|e| Error::SignatureError(e.to_string()))?;
    Ok(sum.secret_bytes())
}

/// `r(32) ‖ s(32) ‖ v(1)`, `v ∈ {0,1,2,3}`, `s` normalized to the lower half-order.
pub fn sign(msg32: &[u8; 32], key: &PrivateKey) -> Result<[u8; 65]> {
    let secp = Secp256k1::new();
    let sk = key.secret_key()?;
    let message = Message::from_digest(*msg32);
    let recoverable = secp.sign_ecdsa_recoverable(&message, &sk);
    let (recovery_id, compact) = recoverable.serialize_compact();

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&compact[0..32]);
    s.copy_from_slice(&compact[32..64]);

    let mut v = recovery_id.to_i32() as u8;
    if s > HALF_ORDER {
        s = sub_mod_order(&ORDER, &s);
        v ^= 1;
    }

    let mut out = [0u8; 65];
    out[0..32].copy_from_slice(&r);
    out[32..64].copy_from_slice(&s);
    out[64] = v;
    Ok(out)
}

/// Subtract `s` from the group order — used to fold a high-s signature to its low-s twin.
fn sub_mod_order(order: &[u8; 32], s: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i32;
    for i in (0..32).rev() {
        let mut diff = order[i] as i32 - s[i] as i32 - borrow;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out[i] = diff as u8;
    }
    out
}

/// Recover the 64-byte `x‖y` public key body from `msg32` and a 65-byte signature.
pub fn recover(msg32: &[u8; 32], sig65: &[u8; 65]) -> Result<[u8; 64]> {
    let secp = Secp256k1::new();
    let recovery_id = RecoveryId::from_i32(sig65[64] as i32)
        .map_err(|_| Error::SignatureError("invalid recovery id".into()))?;
    let mut compact = [0u8; 64];
    compact[0..32].copy_from_slice(&sig65[0..32]);
    compact[32..64].copy_from_slice(&sig65[32..64]);
    let recoverable = RecoverableSignature::from_compact(&compact, recovery_id)
        .map_err(|e| Error::SignatureError(e.to_string()))?;
    let message = Message::from_digest(*msg32);
    let pubkey = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| Error::SignatureError(e.to_string()))?;
    let uncompressed = pubkey.serialize_uncompressed();
    let mut out = [0u8; 64];
    out.copy_from_slice(&uncompressed[1..]);
    Ok(out)
}

/// Verify `sig` (65 bytes, `r‖s‖v`) against `msg32` and a 64-byte `x‖y` public key.
pub fn verify(msg32: &[u8; 32], sig65: &[u8; 65], pubkey_xy: &[u8; 64]) -> Result<bool> {
    let recovered = recover(msg32, sig65)?;
    Ok(&recovered == pubkey_xy)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec property 4: recovered origin from `sign` equals `address_from_private`.
    #[test]
    fn sign_then_recover_round_trips() {
        let key = PrivateKey::generate();
        let msg = [7u8; 32];
        let sig = sign(&msg, &key).unwrap();
        let recovered = recover(&msg, &sig).unwrap();
        let pubkey = to_pubkey(&key).unwrap();
        assert_eq!(recovered, pubkey);
        assert!(verify(&msg, &sig, &pubkey).unwrap());
    }

    #[test]
    fn low_s_is_enforced() {
        let key = PrivateKey::generate();
        let msg = [9u8; 32];
        let sig = sign(&msg, &key).unwrap();
        let mut s = [0u8; 32];
        s.copy_from_slice(&sig[32..64]);
        assert!(s <= HALF_ORDER);
    }

    #[test]
    fn zero_key_is_invalid() {
        assert!(PrivateKey::from_bytes([0u8; 32]).is_err());
    }
}
