use std::fmt;

use macaroons_crypto::{constant_time_eq, MAC_SIZE};
use macaroons_wire::base64url_encode;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Signature size in bytes.
pub const SIGNATURE_SIZE: usize = MAC_SIZE;

/// A 32-byte chained HMAC.
///
/// Equality is constant-time and the bytes are wiped on drop. `Debug` and
/// `Display` render unpadded base64url.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    /// Wraps raw signature bytes.
    pub fn new(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copies a slice that is exactly [`SIGNATURE_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; SIGNATURE_SIZE]>::try_from(bytes).ok().map(Self)
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Compares two signatures in constant time.
    pub fn ct_eq(&self, other: &Signature) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl From<[u8; SIGNATURE_SIZE]> for Signature {
    fn from(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for Signature {}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature")
            .field(&base64url_encode(&self.0))
            .finish()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base64url_encode(&self.0))
    }
}
