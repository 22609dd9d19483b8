use std::fmt;
use std::str::FromStr;

use macaroons_crypto::{bound_hmac, derive_key, hmac_sha256, ZERO_KEY};
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, trace};

use crate::caveat::{Caveat, FirstPartyCaveat, ThirdPartyCaveat};
use crate::caveats::Caveats;
use crate::errors::MacaroonError;
use crate::serialization::{Serializer, V1Serializer};
use crate::signature::Signature;
use crate::verifier::Verifier;

/// A bearer credential with a chained signature over its identifier and caveats.
///
/// Macaroons are immutable: every builder returns a new value and leaves the
/// receiver untouched. The signature always equals the HMAC chain obtained by
/// replaying the caveats in order from `hmac(derive_key(secret), identifier)`.
///
/// # Example
///
/// ```rust
/// use macaroons_core::{Macaroon, Verifier};
///
/// let macaroon = Macaroon::create("https://google.com", "id", b"k")
///     .with_first_party_caveat("id = 123", None);
///
/// let verifier = Verifier::new().satisfy_exact("id = 123");
/// assert!(macaroon.verify(b"k", &verifier)?);
/// assert!(macaroon.verify(b"other", &verifier).is_err());
/// # Ok::<(), macaroons_core::MacaroonError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macaroon {
    location: String,
    identifier: String,
    signature: Signature,
    caveats: Caveats,
}

impl Macaroon {
    /// Assembles a macaroon from known parts without recomputing the signature.
    pub fn from_parts(
        location: impl Into<String>,
        identifier: impl Into<String>,
        signature: Signature,
        caveats: impl Into<Caveats>,
    ) -> Self {
        Self {
            location: location.into(),
            identifier: identifier.into(),
            signature,
            caveats: caveats.into(),
        }
    }

    /// Issues a new macaroon signed with a key derived from `secret`.
    pub fn create(
        location: impl Into<String>,
        identifier: impl Into<String>,
        secret: &[u8],
    ) -> Self {
        let identifier = identifier.into();
        let root_key = derive_key(secret);
        let signature = Signature::new(hmac_sha256(root_key.as_slice(), identifier.as_bytes()));
        drop(root_key);

        Self::from_parts(location, identifier, signature, Caveats::new())
    }

    /// Advisory location of the target service. Not covered by the signature.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Identifier the HMAC chain starts from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current chained signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Caveats in append order.
    pub fn caveats(&self) -> &Caveats {
        &self.caveats
    }

    /// Returns `true` if at least one caveat is attached.
    pub fn has_caveats(&self) -> bool {
        !self.caveats.is_empty()
    }

    /// Iterates over the caveats in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Caveat> {
        self.caveats.iter()
    }

    /// Returns a copy carrying `signature` instead of the current one.
    pub fn with_signature(&self, signature: Signature) -> Macaroon {
        let mut copy = self.clone();
        copy.signature = signature;
        copy
    }

    /// Returns a copy attenuated by a first-party caveat.
    pub fn with_first_party_caveat(
        &self,
        predicate: impl Into<String>,
        location: Option<&str>,
    ) -> Macaroon {
        self.with_caveat(FirstPartyCaveat::new(predicate, location).into())
    }

    /// Returns a copy attenuated by a caveat that the holder of `secret` must discharge.
    ///
    /// # Errors
    ///
    /// Returns [`MacaroonError::Crypto`] if the verification id cannot be sealed.
    pub fn with_third_party_caveat(
        &self,
        secret: &[u8],
        caveat_id: impl Into<String>,
        location: Option<&str>,
    ) -> Result<Macaroon, MacaroonError> {
        let caveat = ThirdPartyCaveat::create(caveat_id, secret, &self.signature, location)?;
        Ok(self.with_caveat(caveat.into()))
    }

    fn with_caveat(&self, caveat: Caveat) -> Macaroon {
        let mut copy = self.clone();
        copy.signature = caveat.sign(&self.signature);
        copy.caveats = self.caveats.with(caveat);
        copy
    }

    /// Binds `discharge` to this macaroon.
    ///
    /// The returned discharge carries `bound_hmac(0^32, self.signature,
    /// discharge.signature)` and only verifies against this macaroon.
    pub fn bind(&self, discharge: &Macaroon) -> Macaroon {
        let bound = bound_hmac(
            &ZERO_KEY,
            self.signature.as_bytes(),
            discharge.signature.as_bytes(),
        );
        discharge.with_signature(Signature::new(bound))
    }

    /// Verifies this macaroon as the root of an authorization request.
    ///
    /// Replays every caveat through `verifier`, recursing into discharge
    /// macaroons for third-party caveats, then compares the final chained
    /// signature with this macaroon's signature in constant time.
    ///
    /// # Errors
    ///
    /// - [`MacaroonError::UnsatisfiedCaveat`] for the first caveat that cannot
    ///   be established; later caveats are not examined
    /// - [`MacaroonError::InvalidSignature`] if a signature check fails
    pub fn verify(&self, secret: &[u8], verifier: &Verifier) -> Result<bool, MacaroonError> {
        let root_key = derive_key(secret);
        let seed = Signature::new(hmac_sha256(root_key.as_slice(), self.identifier.as_bytes()));
        drop(root_key);

        let verifier = self.replay(verifier.with_signature(seed))?;

        if !self.signature.ct_eq(verifier.running_signature()?) {
            debug!(identifier = %self.identifier, "macaroon signature mismatch");
            return Err(MacaroonError::InvalidSignature(
                "the macaroon signature is not valid".to_string(),
            ));
        }

        Ok(true)
    }

    /// Verifies this macaroon as a discharge for a third-party caveat of `root`.
    ///
    /// `root_key` is the key recovered from the caveat's verification id.
    ///
    /// # Errors
    ///
    /// Same as [`Macaroon::verify`]; a signature mismatch names this
    /// discharge's identifier.
    pub fn verify_as_discharge(
        &self,
        root_key: &[u8],
        verifier: &Verifier,
        root: &Macaroon,
    ) -> Result<bool, MacaroonError> {
        let seed = Signature::new(hmac_sha256(root_key, self.identifier.as_bytes()));
        let verifier = self.replay(verifier.with_signature(seed))?;

        let expected = Signature::new(bound_hmac(
            &ZERO_KEY,
            root.signature.as_bytes(),
            verifier.running_signature()?.as_bytes(),
        ));

        if !expected.ct_eq(&self.signature) {
            debug!(identifier = %self.identifier, "discharge signature mismatch");
            return Err(MacaroonError::InvalidSignature(format!(
                "the discharge macaroon with id '{}' signature is not valid",
                self.identifier
            )));
        }

        Ok(true)
    }

    fn replay(&self, mut verifier: Verifier) -> Result<Verifier, MacaroonError> {
        for (index, caveat) in self.caveats.iter().enumerate() {
            trace!(identifier = %self.identifier, index, kind = caveat.kind(), "verifying caveat");
            verifier = caveat.verify(&verifier, self)?;
        }
        Ok(verifier)
    }

    /// Encodes this macaroon as a V1 token.
    ///
    /// # Errors
    ///
    /// Returns [`MacaroonError::Malformed`] if a field does not fit in a packet.
    pub fn serialize(&self) -> Result<String, MacaroonError> {
        self.serialize_with(&V1Serializer)
    }

    /// Encodes this macaroon with the given format.
    pub fn serialize_with<S: Serializer + ?Sized>(
        &self,
        serializer: &S,
    ) -> Result<String, MacaroonError> {
        Serializer::serialize(serializer, self)
    }

    /// Decodes a V1 token.
    ///
    /// # Errors
    ///
    /// Returns [`MacaroonError::Malformed`] for any structural fault.
    pub fn deserialize(data: &str) -> Result<Macaroon, MacaroonError> {
        Self::deserialize_with(data, &V1Serializer)
    }

    /// Decodes a token with the given format.
    pub fn deserialize_with<S: Serializer + ?Sized>(
        data: &str,
        serializer: &S,
    ) -> Result<Macaroon, MacaroonError> {
        Serializer::deserialize(serializer, data)
    }
}

impl<'a> IntoIterator for &'a Macaroon {
    type Item = &'a Caveat;
    type IntoIter = std::slice::Iter<'a, Caveat>;

    fn into_iter(self) -> Self::IntoIter {
        self.caveats.iter()
    }
}

impl FromStr for Macaroon {
    type Err = MacaroonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Macaroon::deserialize(s)
    }
}

impl fmt::Display for Macaroon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "location {}", self.location)?;
        writeln!(f, "identifier {}", self.identifier)?;
        write!(f, "{}", self.caveats)?;
        writeln!(f, "signature {}", self.signature)
    }
}

impl Serialize for Macaroon {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let token = Macaroon::serialize(self).map_err(S::Error::custom)?;
        serializer.serialize_str(&token)
    }
}

impl<'de> Deserialize<'de> for Macaroon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macaroon() -> Macaroon {
        Macaroon::create("https://google.com", "identifier", b"secret key")
    }

    #[test]
    fn create_signs_identifier_with_derived_key() {
        let expected = hmac_sha256(derive_key(b"secret key").as_slice(), b"identifier");
        assert_eq!(macaroon().signature().as_bytes(), &expected);
    }

    #[test]
    fn create_has_no_caveats() {
        assert!(!macaroon().has_caveats());
    }

    #[test]
    fn first_party_caveat_returns_new_macaroon() {
        let original = macaroon();
        let copy = original.with_first_party_caveat("id", None);
        assert!(!original.has_caveats());
        assert!(copy.has_caveats());
        assert_ne!(original.signature(), copy.signature());
    }

    #[test]
    fn third_party_caveat_returns_new_macaroon() {
        let original = macaroon();
        let copy = original
            .with_third_party_caveat(b"root_key", "caveat_id", Some("http://google.com"))
            .unwrap();
        assert!(!original.has_caveats());
        assert!(copy.has_caveats());
        assert!(copy.caveats().get(0).unwrap().is_third_party());
    }

    #[test]
    fn with_signature_returns_new_macaroon() {
        let original = macaroon();
        let copy = original.with_signature(Signature::new([3u8; 32]));
        assert_ne!(copy.signature(), original.signature());
        assert_eq!(copy.identifier(), original.identifier());
    }

    #[test]
    fn bind_rewrites_discharge_signature() {
        let root = macaroon()
            .with_third_party_caveat(b"third_party_secret_key", "caveat_id", Some("http://auth.google.com"))
            .unwrap();
        let discharge = Macaroon::create("http://auth.google.com", "caveat_id", b"third_party_secret_key");
        let bound = root.bind(&discharge);

        assert_ne!(bound.signature(), discharge.signature());
        assert_eq!(bound.identifier(), discharge.identifier());
        assert_eq!(
            bound.signature().as_bytes(),
            &bound_hmac(&ZERO_KEY, root.signature().as_bytes(), discharge.signature().as_bytes())
        );
    }

    #[test]
    fn display_renders_inspection_form() {
        let rendered = Macaroon::create("https://target-service.co", "12345", b"123")
            .with_first_party_caveat("user = 123456", None)
            .to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "location https://target-service.co");
        assert_eq!(lines[1], "identifier 12345");
        assert_eq!(lines[2], "cid user = 123456");
        assert!(lines[3].starts_with("signature "));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn verify_without_caveats() {
        assert!(macaroon().verify(b"secret key", &Verifier::new()).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        assert_eq!(
            macaroon().verify(b"different secret key", &Verifier::new()),
            Err(MacaroonError::InvalidSignature(
                "the macaroon signature is not valid".to_string()
            ))
        );
    }
}
