use std::fmt;
use std::sync::Arc;

use crate::caveat::ThirdPartyCaveat;
use crate::errors::MacaroonError;
use crate::macaroon::Macaroon;
use crate::signature::Signature;

/// General predicate registered with [`Verifier::satisfy_general`].
pub type Predicate = dyn Fn(&str) -> bool + Send + Sync;

/// Accumulates what a verification attempt may rely on.
///
/// Holds exact-match predicates, general predicate callbacks, known discharge
/// macaroons and the running chained signature. Builders never modify the
/// receiver; collections are shared between copies until one of them is
/// extended.
///
/// # Example
///
/// ```rust
/// use macaroons_core::{Macaroon, Verifier};
///
/// let macaroon = Macaroon::create("https://google.com", "identifier", b"secret")
///     .with_first_party_caveat("ip = 127.0.0.1", None);
///
/// let verifier = Verifier::new().satisfy_general(|predicate| {
///     predicate
///         .strip_prefix("ip = ")
///         .map_or(false, |ip| ip == "127.0.0.1")
/// });
/// assert!(macaroon.verify(b"secret", &verifier)?);
/// # Ok::<(), macaroons_core::MacaroonError>(())
/// ```
#[derive(Clone, Default)]
pub struct Verifier {
    signature: Option<Signature>,
    predicates: Arc<Vec<String>>,
    callbacks: Arc<Vec<Arc<Predicate>>>,
    discharges: Arc<Vec<Macaroon>>,
    depth: usize,
}

impl Verifier {
    /// Creates an empty verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts caveats whose predicate equals `predicate` exactly.
    pub fn satisfy_exact(&self, predicate: impl Into<String>) -> Verifier {
        let mut copy = self.clone();
        Arc::make_mut(&mut copy.predicates).push(predicate.into());
        copy
    }

    /// Accepts caveats for which `callback` returns `true`.
    pub fn satisfy_general<F>(&self, callback: F) -> Verifier
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let mut copy = self.clone();
        Arc::make_mut(&mut copy.callbacks).push(Arc::new(callback));
        copy
    }

    /// Registers a discharge macaroon for third-party caveats.
    pub fn with_discharge_macaroon(&self, discharge: Macaroon) -> Verifier {
        let mut copy = self.clone();
        Arc::make_mut(&mut copy.discharges).push(discharge);
        copy
    }

    /// Registers several discharge macaroons, in order.
    pub fn with_discharge_macaroons<I>(&self, discharges: I) -> Verifier
    where
        I: IntoIterator<Item = Macaroon>,
    {
        discharges
            .into_iter()
            .fold(self.clone(), |verifier, discharge| {
                verifier.with_discharge_macaroon(discharge)
            })
    }

    /// Replaces the running signature.
    pub fn with_signature(&self, signature: Signature) -> Verifier {
        let mut copy = self.clone();
        copy.signature = Some(signature);
        copy
    }

    /// Running signature, once verification has seeded it.
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Returns `true` if any exact-match predicate is registered.
    pub fn has_predicates(&self) -> bool {
        !self.predicates.is_empty()
    }

    /// Returns `true` if any general predicate is registered.
    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }

    /// Registered discharge macaroons, in registration order.
    pub fn discharges(&self) -> &[Macaroon] {
        &self.discharges
    }

    /// Returns `true` if `value` equals a registered predicate or any
    /// registered callback accepts it.
    pub fn verify_predicate(&self, value: &str) -> bool {
        self.predicates.iter().any(|predicate| predicate == value)
            || self.callbacks.iter().any(|callback| callback(value))
    }

    /// First registered discharge whose identifier is the caveat id and whose
    /// location matches the caveat location, when the caveat has one.
    pub fn discharge_verifying(&self, caveat: &ThirdPartyCaveat) -> Option<&Macaroon> {
        self.discharges.iter().find(|discharge| {
            discharge.identifier() == caveat.caveat_id()
                && caveat
                    .location()
                    .map_or(true, |location| discharge.location() == location)
        })
    }

    pub(crate) fn running_signature(&self) -> Result<&Signature, MacaroonError> {
        self.signature.as_ref().ok_or_else(|| {
            MacaroonError::InvalidSignature("verifier carries no running signature".to_string())
        })
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn descend(&self) -> Verifier {
        let mut copy = self.clone();
        copy.depth += 1;
        copy
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("predicates", &self.predicates)
            .field("callbacks", &self.callbacks.len())
            .field("discharges", &self.discharges.len())
            .field("seeded", &self.signature.is_some())
            .finish()
    }
}
