use crypto_secretbox::aead::{Aead, AeadCore, KeyInit, Nonce, OsRng};
use crypto_secretbox::XSalsa20Poly1305;
use zeroize::Zeroizing;

use crate::errors::CryptoError;

/// Secret-box key size in bytes.
pub const KEY_SIZE: usize = 32;

/// Secret-box nonce size in bytes.
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size in bytes; the tag precedes the ciphertext.
pub const TAG_SIZE: usize = 16;

/// Right-pads with zeros or truncates `key` to exactly [`KEY_SIZE`] bytes.
///
/// This is a narrowing step, not a hash. Existing tokens depend on it.
pub fn ensure_key_length(key: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut sized = Zeroizing::new([0u8; KEY_SIZE]);
    let len = key.len().min(KEY_SIZE);
    sized[..len].copy_from_slice(&key[..len]);
    sized
}

/// Seals `plaintext` under `key` with a fresh random nonce.
///
/// Returns `nonce || tag || ciphertext`.
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_SIZE]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XSalsa20Poly1305::new(key.into());
    let nonce = XSalsa20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Opens `ciphertext` (tag included) sealed under `key` and `nonce`.
pub fn decrypt(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &[u8; KEY_SIZE],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::Decryption);
    }

    let cipher = XSalsa20Poly1305::new(key.into());
    cipher
        .decrypt(Nonce::<XSalsa20Poly1305>::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Decryption)
}

/// Opens a `nonce || tag || ciphertext` blob produced by [`encrypt`].
pub fn open(sealed: &[u8], key: &[u8; KEY_SIZE]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if sealed.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::Decryption);
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
    decrypt(ciphertext, nonce, key)
}
