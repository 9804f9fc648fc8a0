//! Writes crawl results to persistent storage

mod reconcile;

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use centcom_core::{BanRepository, BanSource, BanSourceRepository};

use crate::engine::SyncEngine;
use crate::error::SyncResult;
use crate::parser::BanParser;

pub use reconcile::{reconcile, ReconcilePlan};

/// How an import obtains and applies bans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Crawl until overlap and insert what is new
    Incremental,
    /// Fetch everything and reconcile storage against it
    Complete,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incremental => f.write_str("incremental"),
            Self::Complete => f.write_str("complete"),
        }
    }
}

/// Outcome of one import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Mode that actually ran, after any fallback
    pub mode: ImportMode,
    pub fetched: usize,
    /// Records the crawl could not normalize
    pub skipped: usize,
    pub inserted: u64,
    pub updated: u64,
    pub removed: u64,
}

impl ImportSummary {
    fn new(mode: ImportMode, fetched: usize) -> Self {
        Self {
            mode,
            fetched,
            skipped: 0,
            inserted: 0,
            updated: 0,
            removed: 0,
        }
    }
}

/// Applies crawl results through the repository traits
#[derive(Clone)]
pub struct BanImporter {
    bans: Arc<dyn BanRepository>,
    sources: Arc<dyn BanSourceRepository>,
}

impl BanImporter {
    pub fn new(bans: Arc<dyn BanRepository>, sources: Arc<dyn BanSourceRepository>) -> Self {
        Self { bans, sources }
    }

    /// Check whether storage holds any ban for the engine's sources
    pub async fn has_bans<P: BanParser>(&self, engine: &SyncEngine<P>) -> SyncResult<bool> {
        let count = self.bans.count_by_sources(&engine.source_names()).await?;
        Ok(count > 0)
    }

    /// Run one import for `engine`
    ///
    /// Source descriptors are registered first so every fetched ban has a
    /// row to reference. An incremental import of a parser without stable ban
    /// ids runs as a complete import instead.
    #[instrument(skip(self, engine), fields(parser = %engine.name()))]
    pub async fn import<P: BanParser>(
        &self,
        engine: &SyncEngine<P>,
        mode: ImportMode,
    ) -> SyncResult<ImportSummary> {
        let descriptors: Vec<BanSource> = engine.parser().sources().iter().cloned().collect();
        self.sources.ensure_sources(&descriptors).await?;

        let summary = match mode {
            ImportMode::Incremental if engine.parser().supports_ban_ids() => {
                self.import_new(engine).await?
            }
            ImportMode::Incremental => {
                warn!("Parser has no stable ban ids, running complete import");
                self.import_complete(engine).await?
            }
            ImportMode::Complete => self.import_complete(engine).await?,
        };

        info!(
            mode = %summary.mode,
            fetched = summary.fetched,
            skipped = summary.skipped,
            inserted = summary.inserted,
            updated = summary.updated,
            removed = summary.removed,
            "Import finished"
        );
        Ok(summary)
    }

    async fn import_new<P: BanParser>(&self, engine: &SyncEngine<P>) -> SyncResult<ImportSummary> {
        let report = engine.crawl_new().await?;
        let mut summary = ImportSummary::new(ImportMode::Incremental, report.bans.len());
        summary.skipped = report.skipped;
        summary.inserted = self.bans.insert_bans(&report.bans).await?;
        Ok(summary)
    }

    /// Reconcile storage against a full crawl
    ///
    /// Removals are withheld when the crawl came back empty while rows are
    /// stored, or when any record was skipped: a ban that failed to normalize
    /// is not evidence that the source dropped it.
    async fn import_complete<P: BanParser>(
        &self,
        engine: &SyncEngine<P>,
    ) -> SyncResult<ImportSummary> {
        let report = engine.crawl_all().await?;
        let stored = self.bans.find_by_sources(&engine.source_names()).await?;

        let mut summary = ImportSummary::new(ImportMode::Complete, report.bans.len());
        summary.skipped = report.skipped;

        let stored_rows = stored.len();
        let fetched_empty = report.bans.is_empty();
        let mut plan = reconcile(stored, report.bans);
        if !plan.remove.is_empty() && (report.skipped > 0 || (fetched_empty && stored_rows > 0)) {
            warn!(
                withheld = plan.remove.len(),
                skipped = report.skipped,
                fetched_empty,
                "Complete fetch looks partial, keeping stored bans"
            );
            plan.remove.clear();
        }
        if plan.is_empty() {
            return Ok(summary);
        }

        summary.removed = self.bans.delete_bans(&plan.remove).await?;
        summary.updated = self.bans.update_bans(&plan.update).await?;
        summary.inserted = self.bans.insert_bans(&plan.insert).await?;
        Ok(summary)
    }
}
