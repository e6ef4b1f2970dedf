//! A cheap-to-clone interned-ish string, used for record field names and
//! alias/recursive-type names.
//!
//! This is a plain `Rc<str>` wrapper rather than a full id-based string
//! interner (`tsz_common::interner::Atom`) — field names in this language are
//! few and short-lived per type, so the extra interning table isn't worth
//! its bookkeeping here. Equality and hashing go through the string content.

use std::fmt;
use std::rc::Rc;

#[derive(Clone, Eq)]
pub struct Atom(Rc<str>);

impl Atom {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl std::hash::Hash for Atom {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_ref().cmp(other.0.as_ref())
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom(Rc::from(s))
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Atom(Rc::from(s.as_str()))
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.0.as_ref())
    }
}
