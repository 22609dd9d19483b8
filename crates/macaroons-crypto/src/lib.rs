//! Cryptographic primitives behind the macaroon HMAC chain.
//!
//! Every operation that touches a signature or a secret in the rest of the
//! workspace goes through this crate:
//! - HMAC-SHA256 chaining, bound HMACs and secret-to-key derivation
//! - XSalsa20-Poly1305 secret boxes carrying third-party root keys
//! - Constant-time comparison and best-effort erasure of key material
//!
//! Derived and decrypted keys are returned inside [`Zeroizing`] containers so
//! they are wiped on every exit path, including early returns on error.

#![deny(missing_docs)]

/// Error types for crypto operations.
pub mod errors;
/// HMAC chaining and key derivation.
pub mod mac;
/// Constant-time comparison and secure erasure.
pub mod memory;
/// Authenticated encryption of third-party root keys.
pub mod secretbox;

pub use errors::CryptoError;
pub use mac::{bound_hmac, derive_key, hmac_sha256, KEY_GENERATOR_CONTEXT, MAC_SIZE, ZERO_KEY};
pub use memory::{constant_time_eq, secure_erase};
pub use secretbox::{decrypt, encrypt, ensure_key_length, open, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use zeroize::Zeroizing;
