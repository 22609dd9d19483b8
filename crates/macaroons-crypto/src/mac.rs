use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::secretbox::KEY_SIZE;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output size in bytes.
pub const MAC_SIZE: usize = 32;

/// Context string for [`derive_key`], right-padded with NUL bytes to 32 bytes.
pub const KEY_GENERATOR_CONTEXT: &[u8] = b"macaroons-key-generator";

/// All-zero key used when binding discharge macaroons to their root.
pub const ZERO_KEY: [u8; KEY_SIZE] = [0u8; KEY_SIZE];

/// Computes `HMAC-SHA256(key, data)`.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; MAC_SIZE] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Computes `hmac(key, hmac(key, first) || hmac(key, second))`.
///
/// Used to sign third-party caveats and to bind a discharge macaroon to the
/// signature of its root macaroon.
pub fn bound_hmac(key: &[u8], first: &[u8], second: &[u8]) -> [u8; MAC_SIZE] {
    let mut joined = Zeroizing::new([0u8; 2 * MAC_SIZE]);
    joined[..MAC_SIZE].copy_from_slice(&hmac_sha256(key, first));
    joined[MAC_SIZE..].copy_from_slice(&hmac_sha256(key, second));
    hmac_sha256(key, joined.as_slice())
}

/// Normalizes a secret of arbitrary length into a 32-byte root key.
pub fn derive_key(secret: &[u8]) -> Zeroizing<[u8; MAC_SIZE]> {
    let mut context = [0u8; KEY_SIZE];
    context[..KEY_GENERATOR_CONTEXT.len()].copy_from_slice(KEY_GENERATOR_CONTEXT);
    Zeroizing::new(hmac_sha256(&context, secret))
}
