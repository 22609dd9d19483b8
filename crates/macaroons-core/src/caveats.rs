use std::fmt;

use crate::caveat::Caveat;

/// Ordered caveat sequence.
///
/// Append order defines the HMAC chain. Every operation returns a new
/// sequence; cloning copies the caveats, so derived macaroons never share
/// storage with their ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caveats {
    caveats: Vec<Caveat>,
}

impl Caveats {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of caveats.
    pub fn len(&self) -> usize {
        self.caveats.len()
    }

    /// Returns `true` if the sequence holds no caveats.
    pub fn is_empty(&self) -> bool {
        self.caveats.is_empty()
    }

    /// Caveat at `index`, in append order.
    pub fn get(&self, index: usize) -> Option<&Caveat> {
        self.caveats.get(index)
    }

    /// Iterates in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Caveat> {
        self.caveats.iter()
    }

    /// Caveats as a slice, in append order.
    pub fn as_slice(&self) -> &[Caveat] {
        &self.caveats
    }

    /// Returns a new sequence with `caveat` appended.
    pub fn with(&self, caveat: Caveat) -> Caveats {
        let mut copy = self.clone();
        copy.caveats.push(caveat);
        copy
    }

    /// Returns a new sequence without the element `caveat` refers to.
    ///
    /// Matching is by identity: `caveat` must be a reference into this
    /// sequence. An equal caveat held elsewhere removes nothing.
    pub fn without(&self, caveat: &Caveat) -> Caveats {
        let mut copy = self.clone();
        if let Some(index) = self.caveats.iter().position(|c| std::ptr::eq(c, caveat)) {
            copy.caveats.remove(index);
        }
        copy
    }

    /// First-party caveats, in append order.
    pub fn first_party(&self) -> Vec<&Caveat> {
        self.caveats.iter().filter(|c| c.is_first_party()).collect()
    }

    /// Third-party caveats, in append order.
    pub fn third_party(&self) -> Vec<&Caveat> {
        self.caveats.iter().filter(|c| c.is_third_party()).collect()
    }
}

impl From<Vec<Caveat>> for Caveats {
    fn from(caveats: Vec<Caveat>) -> Self {
        Self { caveats }
    }
}

impl FromIterator<Caveat> for Caveats {
    fn from_iter<I: IntoIterator<Item = Caveat>>(iter: I) -> Self {
        Self {
            caveats: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Caveats {
    type Item = &'a Caveat;
    type IntoIter = std::slice::Iter<'a, Caveat>;

    fn into_iter(self) -> Self::IntoIter {
        self.caveats.iter()
    }
}

impl fmt::Display for Caveats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.caveats.iter().try_for_each(|caveat| write!(f, "{}", caveat))
    }
}
