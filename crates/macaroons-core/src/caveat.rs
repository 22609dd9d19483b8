use std::fmt;

use macaroons_crypto::{
    bound_hmac, decrypt, derive_key, encrypt, ensure_key_length, hmac_sha256, Zeroizing,
    NONCE_SIZE,
};
use macaroons_wire::base64url_encode;
use tracing::debug;

use crate::errors::MacaroonError;
use crate::macaroon::Macaroon;
use crate::signature::Signature;
use crate::verifier::Verifier;

/// Verification id carried by every first-party caveat.
pub const FIRST_PARTY_VERIFICATION_ID: &[u8] = b"0";

/// Deepest chain of nested discharge macaroons a verification will follow.
pub const MAX_DISCHARGE_DEPTH: usize = 32;

/// A caveat checked locally against the verifier's predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstPartyCaveat {
    predicate: String,
    location: Option<String>,
}

impl FirstPartyCaveat {
    /// Creates a first-party caveat.
    pub fn new(predicate: impl Into<String>, location: Option<&str>) -> Self {
        Self {
            predicate: predicate.into(),
            location: location.map(str::to_string),
        }
    }

    /// The predicate, which is also the caveat id.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// Optional location hint.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// One step of the HMAC chain: `hmac(key, predicate)`.
    pub fn sign(&self, key: &Signature) -> Signature {
        Signature::new(hmac_sha256(key.as_bytes(), self.predicate.as_bytes()))
    }

    /// Checks the predicate and advances the verifier's running signature.
    pub fn verify(&self, verifier: &Verifier) -> Result<Verifier, MacaroonError> {
        if !verifier.verify_predicate(&self.predicate) {
            debug!(caveat = %self.predicate, "first-party caveat not satisfied");
            return Err(MacaroonError::UnsatisfiedCaveat(self.predicate.clone()));
        }

        let running = verifier.running_signature()?;
        Ok(verifier.with_signature(self.sign(running)))
    }
}

/// A caveat discharged by a separate authority.
///
/// The verification id is `nonce || secretbox(root_key)` where the box key is
/// the macaroon signature at the point the caveat was added, and `root_key`
/// is derived from the secret shared with the third party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThirdPartyCaveat {
    caveat_id: String,
    verification_id: Vec<u8>,
    location: Option<String>,
}

impl ThirdPartyCaveat {
    /// Assembles a third-party caveat from already encrypted parts.
    pub fn new(
        caveat_id: impl Into<String>,
        verification_id: impl Into<Vec<u8>>,
        location: Option<&str>,
    ) -> Self {
        Self {
            caveat_id: caveat_id.into(),
            verification_id: verification_id.into(),
            location: location.map(str::to_string),
        }
    }

    /// Creates a third-party caveat for the macaroon currently signed by `signature`.
    ///
    /// # Errors
    ///
    /// Returns [`MacaroonError::Crypto`] if the cipher refuses to seal the root key.
    pub fn create(
        caveat_id: impl Into<String>,
        secret: &[u8],
        signature: &Signature,
        location: Option<&str>,
    ) -> Result<Self, MacaroonError> {
        let root_key = derive_key(secret);
        let box_key = ensure_key_length(signature.as_bytes());
        let verification_id = encrypt(root_key.as_slice(), &box_key)?;

        Ok(Self::new(caveat_id, verification_id, location))
    }

    /// Identifier shared with the discharging party.
    pub fn caveat_id(&self) -> &str {
        &self.caveat_id
    }

    /// Encrypted root key, nonce first.
    pub fn verification_id(&self) -> &[u8] {
        &self.verification_id
    }

    /// Optional location of the discharging party.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// One step of the HMAC chain: `bound_hmac(key, verification_id, caveat_id)`.
    pub fn sign(&self, key: &Signature) -> Signature {
        Signature::new(bound_hmac(
            key.as_bytes(),
            &self.verification_id,
            self.caveat_id.as_bytes(),
        ))
    }

    /// Recovers the third-party root key using the chained signature that was
    /// current when this caveat was added.
    ///
    /// # Errors
    ///
    /// Returns [`MacaroonError::InvalidSignature`] if the verification id does
    /// not open under that signature.
    pub fn root_key(&self, signature: &Signature) -> Result<Zeroizing<Vec<u8>>, MacaroonError> {
        let undecryptable = || {
            MacaroonError::InvalidSignature(format!(
                "verification id of caveat '{}' cannot be decrypted",
                self.caveat_id
            ))
        };

        if self.verification_id.len() < NONCE_SIZE {
            return Err(undecryptable());
        }
        let (nonce, ciphertext) = self.verification_id.split_at(NONCE_SIZE);
        let box_key = ensure_key_length(signature.as_bytes());

        decrypt(ciphertext, nonce, &box_key).map_err(|_| undecryptable())
    }

    /// Verifies the matching discharge macaroon, then advances the verifier's
    /// running signature.
    ///
    /// `root` is the macaroon carrying this caveat; the discharge must be
    /// bound to it.
    pub fn verify(&self, verifier: &Verifier, root: &Macaroon) -> Result<Verifier, MacaroonError> {
        if verifier.depth() >= MAX_DISCHARGE_DEPTH {
            debug!(caveat = %self.caveat_id, depth = verifier.depth(), "discharge chain too deep");
            return Err(MacaroonError::UnsatisfiedCaveat(self.caveat_id.clone()));
        }

        let discharge = verifier.discharge_verifying(self).ok_or_else(|| {
            debug!(caveat = %self.caveat_id, "no discharge macaroon for third-party caveat");
            MacaroonError::UnsatisfiedCaveat(self.caveat_id.clone())
        })?;

        let running = verifier.running_signature()?;
        let root_key = self.root_key(running)?;
        discharge.verify_as_discharge(&root_key, &verifier.descend(), root)?;

        Ok(verifier.with_signature(self.sign(running)))
    }
}

/// A restriction attached to a macaroon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caveat {
    /// Checked locally by the verifier.
    FirstParty(FirstPartyCaveat),
    /// Discharged by another macaroon.
    ThirdParty(ThirdPartyCaveat),
}

impl Caveat {
    /// Caveat id: the predicate for first-party caveats.
    pub fn caveat_id(&self) -> &str {
        match self {
            Caveat::FirstParty(caveat) => caveat.predicate(),
            Caveat::ThirdParty(caveat) => caveat.caveat_id(),
        }
    }

    /// Verification id: `"0"` for first-party caveats.
    pub fn verification_id(&self) -> &[u8] {
        match self {
            Caveat::FirstParty(_) => FIRST_PARTY_VERIFICATION_ID,
            Caveat::ThirdParty(caveat) => caveat.verification_id(),
        }
    }

    /// Optional location hint.
    pub fn location(&self) -> Option<&str> {
        match self {
            Caveat::FirstParty(caveat) => caveat.location(),
            Caveat::ThirdParty(caveat) => caveat.location(),
        }
    }

    /// Returns `true` for first-party caveats.
    pub fn is_first_party(&self) -> bool {
        matches!(self, Caveat::FirstParty(_))
    }

    /// Returns `true` for third-party caveats.
    pub fn is_third_party(&self) -> bool {
        matches!(self, Caveat::ThirdParty(_))
    }

    /// Short name of the caveat kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Caveat::FirstParty(_) => "first-party",
            Caveat::ThirdParty(_) => "third-party",
        }
    }

    /// Chains `key` through this caveat.
    pub fn sign(&self, key: &Signature) -> Signature {
        match self {
            Caveat::FirstParty(caveat) => caveat.sign(key),
            Caveat::ThirdParty(caveat) => caveat.sign(key),
        }
    }

    /// Verifies this caveat as part of `root`, returning the advanced verifier.
    pub fn verify(&self, verifier: &Verifier, root: &Macaroon) -> Result<Verifier, MacaroonError> {
        match self {
            Caveat::FirstParty(caveat) => caveat.verify(verifier),
            Caveat::ThirdParty(caveat) => caveat.verify(verifier, root),
        }
    }
}

impl From<FirstPartyCaveat> for Caveat {
    fn from(caveat: FirstPartyCaveat) -> Self {
        Caveat::FirstParty(caveat)
    }
}

impl From<ThirdPartyCaveat> for Caveat {
    fn from(caveat: ThirdPartyCaveat) -> Self {
        Caveat::ThirdParty(caveat)
    }
}

impl fmt::Display for Caveat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cid {}", self.caveat_id())?;
        if let Caveat::ThirdParty(caveat) = self {
            writeln!(f, "vid {}", base64url_encode(caveat.verification_id()))?;
        }
        if let Some(location) = self.location() {
            writeln!(f, "cl {}", location)?;
        }
        Ok(())
    }
}
