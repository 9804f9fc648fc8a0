//! Repository traits (ports) - define the interface for ban persistence
//!
//! The synchronization engine only reads through these traits; the import
//! service is the one caller of the write methods.

use async_trait::async_trait;

use crate::entities::{Ban, BanSource, StoredBan};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Ban Repository
// ============================================================================

#[async_trait]
pub trait BanRepository: Send + Sync {
    /// Most recent bans for the given sources, newest `banned_on` first,
    /// with job bans and source attached
    async fn recent_bans(&self, source_names: &[String], limit: i64) -> RepoResult<Vec<Ban>>;

    /// Every stored ban for the given sources
    async fn find_by_sources(&self, source_names: &[String]) -> RepoResult<Vec<StoredBan>>;

    /// Count stored bans for the given sources
    async fn count_by_sources(&self, source_names: &[String]) -> RepoResult<i64>;

    /// Insert bans, skipping any whose `(source, ban_id)` is already stored.
    /// Returns the number of rows inserted.
    async fn insert_bans(&self, bans: &[Ban]) -> RepoResult<u64>;

    /// Replace the content of existing rows, job bans included
    async fn update_bans(&self, bans: &[StoredBan]) -> RepoResult<u64>;

    /// Delete rows by storage id
    async fn delete_bans(&self, ids: &[i64]) -> RepoResult<u64>;
}

// ============================================================================
// Ban Source Repository
// ============================================================================

#[async_trait]
pub trait BanSourceRepository: Send + Sync {
    /// Insert or update sources by name
    async fn ensure_sources(&self, sources: &[BanSource]) -> RepoResult<()>;

    /// List every registered source
    async fn find_all(&self) -> RepoResult<Vec<BanSource>>;
}
