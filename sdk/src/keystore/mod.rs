//! Web3 Secret Storage v3 keystores (spec.md §4.10): PBKDF2 or Scrypt key derivation,
//! AES-128-CTR encryption, Keccak-256 MAC.

use aes::cipher::{generic_array::GenericArray, KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::RngCore;
use scrypt::{scrypt, Params as ScryptParams};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::hash::keccak256;
use crate::hex;
use crate::secp256k1::PrivateKey;

type Aes128Ctr = Ctr128BE<aes::Aes128>;

const PBKDF2_ROUNDS: u32 = 262_144;
const SCRYPT_N: u32 = 1 << 18;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// A Web3 Secret Storage v3 keystore file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keystore {
    pub version: u32,
    pub id: String,
    pub address: String,
    pub crypto: CryptoParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoParams {
    pub cipher: String,
    pub ciphertext: String,
    #[serde(rename = "cipherparams")]
    pub cipher_params: CipherParams,
    pub kdf: String,
    #[serde(rename = "kdfparams")]
    pub kdf_params: KdfParams,
    pub mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    pub iv: String,
}

/// KDF parameters: either PBKDF2 or Scrypt, distinguished by `CryptoParams::kdf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfParams {
    pub dklen: u32,
    pub salt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prf: Option<String>,
}

/// Which key-derivation function to use when encrypting a new keystore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
    Pbkdf2,
    Scrypt,
}

fn derive_key(password: &[u8], salt: &[u8], kdf: Kdf) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    match kdf {
        Kdf::Pbkdf2 => {
            pbkdf2::<Hmac<Sha256>>(password, salt, PBKDF2_ROUNDS, &mut key)
                .map_err(|e| Error::KeystoreError(e.to_string()))?;
        }
        Kdf::Scrypt => {
            let params = ScryptParams::new(SCRYPT_N.trailing_zeros() as u8, SCRYPT_R, SCRYPT_P, 32)
                .map_err(|e| Error::KeystoreError(e.to_string()))?;
            scrypt(password, salt, &params, &mut key)
                .map_err(|e| Error::KeystoreError(e.to_string()))?;
        }
    }
    Ok(key)
}

/// Encrypt `private_key` under `password` into a v3 keystore.
pub fn encrypt(private_key: &PrivateKey, password: &str, kdf: Kdf) -> Result<Keystore> {
    let mut salt = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let derived_key = derive_key(password.as_bytes(), &salt, kdf)?;

    let mut ciphertext = private_key.0.to_vec();
    let mut cipher = Aes128Ctr::new(
        GenericArray::from_slice(&derived_key[0..16]),
        GenericArray::from_slice(&iv),
    );
    cipher.apply_keystream(&mut ciphertext);

    let mac_preimage: Vec<u8> = derived_key[16..32]
        .iter()
        .chain(ciphertext.iter())
        .copied()
        .collect();
    let mac = keccak256(&mac_preimage);

    let address = crate::secp256k1::to_pubkey(private_key)
        .map(|pk| crate::address::Address::from_pubkey(&pk).to_checksum())?;

    let kdf_params = match kdf {
        Kdf::Pbkdf2 => KdfParams {
            dklen: 32,
            salt: hex::encode_lower(&salt),
            c: Some(PBKDF2_ROUNDS),
            n: None,
            r: None,
            p: None,
            prf: Some("hmac-sha256".to_string()),
        },
        Kdf::Scrypt => KdfParams {
            dklen: 32,
            salt: hex::encode_lower(&salt),
            c: None,
            n: Some(SCRYPT_N),
            r: Some(SCRYPT_R),
            p: Some(SCRYPT_P),
            prf: None,
        },
    };

    Ok(Keystore {
        version: 3,
        id: uuid::Uuid::new_v4().to_string(),
        address,
        crypto: CryptoParams {
            cipher: "aes-128-ctr".to_string(),
            ciphertext: hex::encode_lower(&ciphertext),
            cipher_params: CipherParams {
                iv: hex::encode_lower(&iv),
            },
            kdf: match kdf {
                Kdf::Pbkdf2 => "pbkdf2".to_string(),
                Kdf::Scrypt => "scrypt".to_string(),
            },
            kdf_params,
            mac: hex::encode_lower(&mac),
        },
    })
}

/// Decrypt a keystore with `password`, verifying the MAC before returning the key.
pub fn decrypt(keystore: &Keystore, password: &str) -> Result<PrivateKey> {
    let salt = hex::from_hex(&keystore.crypto.kdf_params.salt)?;
    let kdf = match keystore.crypto.kdf.as_str() {
        "pbkdf2" => Kdf::Pbkdf2,
        "scrypt" => Kdf::Scrypt,
        other => return Err(Error::KeystoreError(format!("unsupported kdf: {other}"))),
    };
    let derived_key = derive_key(password.as_bytes(), &salt, kdf)?;

    let ciphertext = hex::from_hex(&keystore.crypto.ciphertext)?;
    let mac_preimage: Vec<u8> = derived_key[16..32]
        .iter()
        .chain(ciphertext.iter())
        .copied()
        .collect();
    let expected_mac = keccak256(&mac_preimage);
    let given_mac = hex::from_hex(&keystore.crypto.mac)?;
    // Constant-time: a short-circuiting comparison here would leak how many leading MAC
    // bytes matched, and with it information about the password.
    if given_mac.len() != expected_mac.len() || expected_mac.ct_eq(&given_mac).unwrap_u8() == 0 {
        return Err(Error::InvalidPassword);
    }

    let iv = hex::from_hex(&keystore.crypto.cipher_params.iv)?;
    let mut plaintext = ciphertext;
    let mut cipher = Aes128Ctr::new(
        GenericArray::from_slice(&derived_key[0..16]),
        GenericArray::from_slice(&iv),
    );
    cipher.apply_keystream(&mut plaintext);

    if plaintext.len() != 32 {
        return Err(Error::KeystoreError(format!(
            "decrypted key has {} bytes, expected 32",
            plaintext.len()
        )));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&plaintext);
    PrivateKey::from_bytes(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// spec property 9: encrypt/decrypt round-trips; wrong password is rejected.
    #[test]
    fn round_trips_with_correct_password() {
        let key = PrivateKey::generate();
        let keystore = encrypt(&key, "hunter2", Kdf::Pbkdf2).unwrap();
        let recovered = decrypt(&keystore, "hunter2").unwrap();
        assert_eq!(recovered.0, key.0);
    }

    #[test]
    fn rejects_wrong_password() {
        let key = PrivateKey::generate();
        let keystore = encrypt(&key, "hunter2", Kdf::Scrypt).unwrap();
        assert!(matches!(decrypt(&keystore, "wrong"), Err(Error::InvalidPassword)));
    }

    #[test]
    fn keystore_serializes_to_v3_json_shape() {
        let key = PrivateKey::generate();
        let keystore = encrypt(&key, "pw", Kdf::Pbkdf2).unwrap();
        let json = serde_json::to_value(&keystore).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["crypto"]["cipher"], "aes-128-ctr");
    }
}
