//! Test helpers: in-memory persistence and engine wiring

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use centcom_core::{
    Ban, BanRepository, BanSource, BanSourceRepository, DomainError, RepoResult, StoredBan,
};
use centcom_sync::{BanImporter, BanParser, EngineOptions, SyncEngine};

#[derive(Default)]
struct StoreState {
    next_id: i64,
    rows: Vec<StoredBan>,
    sources: Vec<BanSource>,
}

/// Implements both repository traits over a mutex-guarded vector
///
/// Mirrors the PostgreSQL behavior the engine relies on: inserts are
/// idempotent on `(source, ban_id)` and reference a registered source.
#[derive(Default)]
pub struct InMemoryBanStore {
    state: Mutex<StoreState>,
    recent_calls: AtomicUsize,
}

impl InMemoryBanStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register sources and store bans without going through the traits
    pub fn seed(&self, bans: impl IntoIterator<Item = Ban>) {
        let mut state = self.state.lock().unwrap();
        for ban in bans {
            if !state.sources.contains(&ban.source) {
                state.sources.push(ban.source.clone());
            }
            state.next_id += 1;
            let id = state.next_id;
            state.rows.push(StoredBan { id, ban });
        }
    }

    /// Stored bans in insertion order
    pub fn bans(&self) -> Vec<Ban> {
        self.rows().into_iter().map(|row| row.ban).collect()
    }

    pub fn rows(&self) -> Vec<StoredBan> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn sources(&self) -> Vec<BanSource> {
        self.state.lock().unwrap().sources.clone()
    }

    /// Number of `recent_bans` reads so far
    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

fn matches_source(ban: &Ban, names: &[String]) -> bool {
    names.iter().any(|name| *name == ban.source.name)
}

#[async_trait]
impl BanRepository for InMemoryBanStore {
    async fn recent_bans(&self, source_names: &[String], limit: i64) -> RepoResult<Vec<Ban>> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        let mut bans: Vec<Ban> = state
            .rows
            .iter()
            .filter(|row| matches_source(&row.ban, source_names))
            .map(|row| row.ban.clone())
            .collect();
        bans.sort_by(|a, b| b.banned_on.cmp(&a.banned_on));
        bans.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(bans)
    }

    async fn find_by_sources(&self, source_names: &[String]) -> RepoResult<Vec<StoredBan>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .filter(|row| matches_source(&row.ban, source_names))
            .cloned()
            .collect())
    }

    async fn count_by_sources(&self, source_names: &[String]) -> RepoResult<i64> {
        let state = self.state.lock().unwrap();
        let count = state
            .rows
            .iter()
            .filter(|row| matches_source(&row.ban, source_names))
            .count();
        Ok(i64::try_from(count).unwrap())
    }

    async fn insert_bans(&self, bans: &[Ban]) -> RepoResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut inserted = 0;
        for ban in bans {
            if !state.sources.iter().any(|s| s.name == ban.source.name) {
                return Err(DomainError::SourceNotFound(ban.source.name.clone()));
            }
            let key = ban.dedup_key();
            if key.is_some() && state.rows.iter().any(|row| row.ban.dedup_key() == key) {
                continue;
            }
            state.next_id += 1;
            let id = state.next_id;
            state.rows.push(StoredBan { id, ban: ban.clone() });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update_bans(&self, bans: &[StoredBan]) -> RepoResult<u64> {
        let mut state = self.state.lock().unwrap();
        for update in bans {
            let row = state
                .rows
                .iter_mut()
                .find(|row| row.id == update.id)
                .ok_or(DomainError::BanNotFound(update.id))?;
            row.ban = update.ban.clone();
        }
        Ok(bans.len() as u64)
    }

    async fn delete_bans(&self, ids: &[i64]) -> RepoResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.rows.len();
        state.rows.retain(|row| !ids.contains(&row.id));
        Ok((before - state.rows.len()) as u64)
    }
}

#[async_trait]
impl BanSourceRepository for InMemoryBanStore {
    async fn ensure_sources(&self, sources: &[BanSource]) -> RepoResult<()> {
        let mut state = self.state.lock().unwrap();
        for source in sources {
            match state.sources.iter_mut().find(|s| s.name == source.name) {
                Some(existing) => *existing = source.clone(),
                None => state.sources.push(source.clone()),
            }
        }
        Ok(())
    }

    async fn find_all(&self) -> RepoResult<Vec<BanSource>> {
        Ok(self.state.lock().unwrap().sources.clone())
    }
}

/// Engine over `parser` backed by `store`, with default options
pub fn engine<P: BanParser>(parser: P, store: &Arc<InMemoryBanStore>) -> SyncEngine<P> {
    engine_with(parser, store, EngineOptions::default())
}

pub fn engine_with<P: BanParser>(
    parser: P,
    store: &Arc<InMemoryBanStore>,
    options: EngineOptions,
) -> SyncEngine<P> {
    let bans: Arc<dyn BanRepository> = store.clone();
    SyncEngine::new(parser, bans, options).unwrap()
}

/// Importer writing into `store`
pub fn importer(store: &Arc<InMemoryBanStore>) -> BanImporter {
    let bans: Arc<dyn BanRepository> = store.clone();
    let sources: Arc<dyn BanSourceRepository> = store.clone();
    BanImporter::new(bans, sources)
}
