//! Macaroons: bearer credentials with contextual caveats.
//!
//! This crate provides:
//! - [`Macaroon`] issuance and attenuation with first- and third-party caveats
//! - Discharge binding for third-party caveats
//! - A [`Verifier`] holding predicates, callbacks and discharge macaroons
//! - The V1 token format through [`Serializer`] / [`V1Serializer`]
//!
//! ## Quick Start
//!
//! ```rust
//! use macaroons_core::{Macaroon, Verifier};
//!
//! // Target service issues a macaroon and attenuates it
//! let macaroon = Macaroon::create("https://target-service.co", "12345", b"root secret")
//!     .with_first_party_caveat("user = alice", None)
//!     .with_third_party_caveat(b"shared with auth", "user_auth", Some("https://auth.example.org"))?;
//! let token = macaroon.serialize()?;
//!
//! // Third party issues a discharge; the holder binds it
//! let discharge = Macaroon::create("https://auth.example.org", "user_auth", b"shared with auth");
//! let received = Macaroon::deserialize(&token)?;
//! let bound = received.bind(&discharge);
//!
//! // Target service verifies
//! let verifier = Verifier::new()
//!     .satisfy_exact("user = alice")
//!     .with_discharge_macaroon(bound);
//! assert!(received.verify(b"root secret", &verifier)?);
//! # Ok::<(), macaroons_core::MacaroonError>(())
//! ```
//!
//! ## Key Types
//!
//! - [`Macaroon`] - Immutable credential with a chained signature
//! - [`Caveat`] - First- or third-party restriction
//! - [`Verifier`] - What a verification attempt may rely on
//! - [`MacaroonError`] - Malformed data, unsatisfied caveats, bad signatures
//!
//! Secrets passed to [`Macaroon::create`], [`Macaroon::verify`] and
//! [`Macaroon::with_third_party_caveat`] are only borrowed; derived keys are
//! wiped before those calls return.

#![deny(missing_docs)]

/// Caveat kinds and their chain steps.
pub mod caveat;
/// Ordered caveat sequences.
pub mod caveats;
/// Error types for macaroon operations.
pub mod errors;
/// The macaroon entity.
pub mod macaroon;
/// Token formats.
pub mod serialization;
/// Chained signature value.
pub mod signature;
/// Verification context.
pub mod verifier;

pub use caveat::{
    Caveat, FirstPartyCaveat, ThirdPartyCaveat, FIRST_PARTY_VERIFICATION_ID, MAX_DISCHARGE_DEPTH,
};
pub use caveats::Caveats;
pub use errors::MacaroonError;
pub use macaroon::Macaroon;
pub use serialization::{Serializer, V1Serializer};
pub use signature::{Signature, SIGNATURE_SIZE};
pub use verifier::{Predicate, Verifier};
