//! BIP-39 mnemonic generation and seed derivation (spec.md §4.10).

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Digest, Sha256, Sha512};

use crate::error::{Error, Result};

const WORDLIST_TEXT: &str = include_str!("english.txt");
const PBKDF2_ROUNDS: u32 = 2048;

fn wordlist() -> Vec<&'static str> {
    WORDLIST_TEXT.lines().collect()
}

/// Generate a mnemonic from `entropy`. `entropy.len()` must be one of 16/20/24/28/32 bytes
/// (128/160/192/224/256 bits), per BIP-39.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String> {
    let bits = entropy.len() * 8;
    if ![128, 160, 192, 224, 256].contains(&bits) {
        return Err(Error::InvalidEntropyLength(bits));
    }
    let words = wordlist();
    let checksum_bits = bits / 32;
    let checksum_byte = Sha256::digest(entropy)[0];

    let mut bitstring: Vec<bool> = Vec::with_capacity(bits + checksum_bits);
    for byte in entropy {
        for i in (0..8).rev() {
            bitstring.push((byte >> i) & 1 == 1);
        }
    }
    for i in 0..checksum_bits {
        bitstring.push((checksum_byte >> (7 - i)) & 1 == 1);
    }

    let mnemonic = bitstring
        .chunks(11)
        .map(|chunk| {
            let index = chunk.iter().fold(0u16, |acc, &bit| (acc << 1) | (bit as u16));
            words[index as usize]
        })
        .collect::<Vec<_>>()
        .join(" ");
    Ok(mnemonic)
}

/// Parse a mnemonic back into its entropy, validating the embedded checksum.
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<Vec<u8>> {
    let words = wordlist();
    let given: Vec<&str> = mnemonic.split_whitespace().collect();
    if ![12, 15, 18, 21, 24].contains(&given.len()) {
        return Err(Error::InvalidWordCount(given.len()));
    }

    let mut bitstring = Vec::with_capacity(given.len() * 11);
    for word in &given {
        let index = words
            .iter()
            .position(|w| w == word)
            .ok_or_else(|| Error::InvalidWord(word.to_string()))?;
        for i in (0..11).rev() {
            bitstring.push((index >> i) & 1 == 1);
        }
    }

    let total_bits = bitstring.len();
    let checksum_bits = total_bits / 33;
    let entropy_bits = total_bits - checksum_bits;

    let mut entropy = vec![0u8; entropy_bits / 8];
    for (i, chunk) in bitstring[..entropy_bits].chunks(8).enumerate() {
        let byte = chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit as u8));
        entropy[i] = byte;
    }

    let expected_checksum_byte = Sha256::digest(&entropy)[0];
    let mut given_checksum = 0u8;
    for (i, &bit) in bitstring[entropy_bits..].iter().enumerate() {
        given_checksum |= (bit as u8) << (checksum_bits - 1 - i);
    }
    let expected_checksum = expected_checksum_byte >> (8 - checksum_bits);
    if given_checksum != expected_checksum {
        return Err(Error::InvalidChecksum);
    }

    Ok(entropy)
}

/// Derive a 64-byte seed from `mnemonic` and an optional `passphrase` via
/// PBKDF2-HMAC-SHA512 with 2048 rounds, per BIP-39.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> [u8; 64] {
    let salt = format!("mnemonic{passphrase}");
    let mut seed = [0u8; 64];
    pbkdf2::<Hmac<Sha512>>(mnemonic.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed)
        .expect("HMAC-SHA512 output length is always valid for pbkdf2");
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;

    /// spec.md §8 S5.
    #[test]
    fn zero_entropy_yields_abandon_mnemonic() {
        let entropy = [0u8; 16];
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        assert_eq!(
            mnemonic,
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        );
    }

    /// spec.md §8 S5.
    #[test]
    fn zero_entropy_seed_with_trezor_passphrase_matches_vector() {
        let mnemonic = entropy_to_mnemonic(&[0u8; 16]).unwrap();
        let seed = mnemonic_to_seed(&mnemonic, "TREZOR");
        assert!(hex::to_hex(&seed).starts_with("0xc55257c360c07c7202"));
    }

    #[test]
    fn mnemonic_round_trips_through_entropy() {
        let entropy = [0x42u8; 32];
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        let recovered = mnemonic_to_entropy(&mnemonic).unwrap();
        assert_eq!(recovered, entropy);
    }

    #[test]
    fn rejects_bad_checksum() {
        let entropy = [0x01u8; 16];
        let mnemonic = entropy_to_mnemonic(&entropy).unwrap();
        let mut words: Vec<&str> = mnemonic.split_whitespace().collect();
        let last = words.len() - 1;
        let candidates = wordlist();
        words[last] = if words[last] == candidates[0] { candidates[1] } else { candidates[0] };
        let tampered = words.join(" ");
        assert!(mnemonic_to_entropy(&tampered).is_err());
    }

    #[test]
    fn rejects_unknown_word() {
        let mnemonic = "notaword abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert!(mnemonic_to_entropy(mnemonic).is_err());
    }
}
