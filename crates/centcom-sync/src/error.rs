//! Synchronization error types
//!
//! Failures are split by how the engine reacts to them: fetch errors abort a
//! crawl, normalize errors skip one record, registry errors refuse to build.

use centcom_core::DomainError;
use thiserror::Error;

/// Transport failure reported by a source's fetch service
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A single raw record that could not be turned into a canonical ban
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Record has no ban id")]
    MissingBanId,

    #[error("Record is missing field {0}")]
    MissingField(&'static str),

    #[error("Invalid timestamp in {field}: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Invalid ckey: {0:?}")]
    InvalidCKey(String),

    #[error("Record names unknown source {0:?}")]
    UnknownSource(String),

    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Invalid source descriptor table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Source registry is empty")]
    Empty,

    #[error("Duplicate source key: {0}")]
    DuplicateKey(String),

    #[error("Duplicate source name: {0}")]
    DuplicateName(String),

    #[error("Source {0:?} has an empty name")]
    EmptyName(String),
}

/// Errors surfaced by a crawl or import
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Repository(#[from] DomainError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{parser} does not report stable ban ids; incremental crawls are unsupported")]
    IncrementalUnsupported { parser: String },

    #[error("Crawl of {parser} was cancelled")]
    Cancelled { parser: String },

    #[error("Invalid engine options: {0}")]
    InvalidOptions(String),
}

impl SyncError {
    /// Check if the crawl may succeed if retried later
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Repository(DomainError::DatabaseError(_)))
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
