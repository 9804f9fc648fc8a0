//! Source descriptor registry
//!
//! Maps the short keys a parser uses for its sub-sources to their
//! [`BanSource`] descriptors. Built once when the parser is constructed and
//! read-only afterwards.

use std::collections::HashSet;

use centcom_core::BanSource;

use crate::error::{NormalizeError, RegistryError};

/// Validated, non-empty table of sources served by one parser
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    entries: Vec<(String, BanSource)>,
}

impl SourceRegistry {
    /// Start building a registry
    pub fn builder() -> SourceRegistryBuilder {
        SourceRegistryBuilder::default()
    }

    /// Registry serving exactly one source
    pub fn single(key: impl Into<String>, source: BanSource) -> Result<Self, RegistryError> {
        Self::builder().source(key, source).build()
    }

    /// Look up a source by key
    pub fn get(&self, key: &str) -> Option<&BanSource> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, source)| source)
    }

    /// The first registered source, used for records that name none
    pub fn primary(&self) -> &BanSource {
        &self.entries[0].1
    }

    /// Resolve the source a record belongs to
    pub fn resolve(&self, key: Option<&str>) -> Result<&BanSource, NormalizeError> {
        match key {
            None => Ok(self.primary()),
            Some(key) => self
                .get(key)
                .ok_or_else(|| NormalizeError::UnknownSource(key.to_string())),
        }
    }

    /// Source names, in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, s)| s.name.clone()).collect()
    }

    /// Iterate over sources in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BanSource> {
        self.entries.iter().map(|(_, source)| source)
    }

    /// Iterate over `(key, source)` pairs in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &BanSource)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    /// Check if a source name is served by this registry
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|(_, s)| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A built registry holds at least one source, so this is false
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`SourceRegistry`]
#[derive(Debug, Default)]
pub struct SourceRegistryBuilder {
    entries: Vec<(String, BanSource)>,
}

impl SourceRegistryBuilder {
    /// Register a source under `key`
    pub fn source(mut self, key: impl Into<String>, source: BanSource) -> Self {
        self.entries.push((key.into(), source));
        self
    }

    /// Validate and build the registry
    pub fn build(self) -> Result<SourceRegistry, RegistryError> {
        if self.entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for (key, source) in &self.entries {
            if source.name.is_empty() {
                return Err(RegistryError::EmptyName(key.clone()));
            }
            if !keys.insert(key.as_str()) {
                return Err(RegistryError::DuplicateKey(key.clone()));
            }
            if !names.insert(source.name.as_str()) {
                return Err(RegistryError::DuplicateName(source.name.clone()));
            }
        }

        Ok(SourceRegistry {
            entries: self.entries,
        })
    }
}

/// Check that no source name is served by more than one registry
pub fn ensure_disjoint<'a>(
    registries: impl IntoIterator<Item = &'a SourceRegistry>,
) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for registry in registries {
        for source in registry.iter() {
            if !seen.insert(source.name.as_str()) {
                return Err(RegistryError::DuplicateName(source.name.clone()));
            }
        }
    }
    Ok(())
}
