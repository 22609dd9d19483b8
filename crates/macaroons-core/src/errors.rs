use macaroons_crypto::CryptoError;
use macaroons_wire::WireError;
use thiserror::Error;

/// Errors raised while issuing, serializing or verifying macaroons.
///
/// Verification stops at the first error; there is no partial success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacaroonError {
    /// Structurally invalid wire data.
    #[error("malformed macaroon: {0}")]
    Malformed(#[from] WireError),
    /// No predicate, callback or discharge macaroon satisfies the caveat.
    #[error("caveat '{0}' is not satisfied")]
    UnsatisfiedCaveat(String),
    /// A signature check failed or a verification id could not be decrypted.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
    /// The cipher failed while issuing a third-party caveat.
    #[error("crypto failure: {0}")]
    Crypto(#[from] CryptoError),
}
