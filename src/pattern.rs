//! Path canonicalization.
//!
//! Every key in the route table goes through [`normalize`] first. The output
//! always starts with exactly one `/`, never ends with `/` (except the root
//! itself), and has no empty segments:
//!
//! ```text
//! "test/"   → "/test"
//! "/test/"  → "/test"
//! "test"    → "/test"
//! "a//b/"   → "/a/b"
//! ""        → ""        (a group's "no prefix", never a route key)
//! ```
//!
//! Normalization happens at registration only. Request paths are matched as
//! they arrive.

use std::fmt;

use crate::error::{Error, Result};

/// A canonical path. Only [`normalize`] produces one.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pattern(String);

/// Canonicalizes `raw`. Idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// Fails with [`Error::InvalidPattern`] if `raw` contains whitespace, unless
/// `raw` is nothing but whitespace, which yields the empty pattern.
pub fn normalize(raw: &str) -> Result<Pattern> {
    if raw.trim().is_empty() {
        return Ok(Pattern::default());
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(Error::InvalidPattern(raw.to_owned()));
    }

    let mut out = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    Ok(Pattern(out))
}

impl Pattern {
    pub(crate) fn parse(raw: &str) -> Result<Self> {
        normalize(raw)
    }

    pub fn as_str(&self) -> &str { &self.0 }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn is_root(&self) -> bool { self.0 == "/" }

    /// `self` followed by `child`.
    ///
    /// An empty or root side contributes nothing, so the result keeps the
    /// no-trailing-slash and no-`//` invariants: `/api` + `/` is `/api`,
    /// `/` + `/x` is `/x`.
    pub(crate) fn join(&self, child: &Pattern) -> Pattern {
        if self.is_empty() || self.is_root() {
            return if child.is_empty() { self.clone() } else { child.clone() };
        }
        if child.is_empty() || child.is_root() {
            return self.clone();
        }
        Pattern(format!("{}{}", self.0, child.0))
    }

    /// Route keys are never empty: `""` is stored as `/`.
    pub(crate) fn or_root(self) -> Pattern {
        if self.is_empty() { Pattern("/".to_owned()) } else { self }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str { &self.0 }
}
