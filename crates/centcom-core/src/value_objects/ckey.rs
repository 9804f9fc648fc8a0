//! CKey - canonical BYOND player key
//!
//! Remote sources report player identities in whatever form their admins typed
//! them ("Some Player", "some_player", "SomePlayer"). The canonical key is the
//! lower-cased name with everything but ASCII letters and digits stripped, which
//! is the identity every source agrees on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

/// Normalized player identity key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CKey(String);

impl CKey {
    /// Canonicalize a raw player key
    ///
    /// Fails if nothing remains after normalization.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if key.is_empty() {
            return Err(DomainError::InvalidCKey(raw.to_string()));
        }

        Ok(Self(key))
    }

    /// Get the key as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CKey::parse(s)
    }
}

impl AsRef<str> for CKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for CKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

// Deserializing re-applies normalization so stored keys can never drift
impl<'de> Deserialize<'de> for CKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}
