use thiserror::Error;

/// Errors raised by the secret-box primitives.
///
/// HMAC operations are infallible; only encryption and decryption can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The cipher refused to seal the plaintext.
    #[error("encryption failed: {0}")]
    Encryption(String),
    /// The ciphertext did not authenticate under the given key and nonce.
    #[error("decryption failed: ciphertext rejected")]
    Decryption,
}
