//! Synchronization engine
//!
//! Generic driver over a [`BanParser`]. The parser supplies fetch calls and
//! record normalization; the engine owns every control-flow decision: which
//! pages to request, when to stop, and which records survive.

mod dedup;
mod incremental;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use centcom_core::{Ban, BanRepository, BanSource};

use crate::error::{NormalizeError, SyncError, SyncResult};
use crate::parser::BanParser;

pub use dedup::dedup_bans;
pub use incremental::StopReason;

/// Tunables for a crawl
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Number of most recent stored bans used as the overlap window
    pub recent_window: i64,
    /// Stop an incremental crawl after this many pages even without overlap
    pub max_pages: Option<u32>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            recent_window: 5,
            max_pages: None,
        }
    }
}

impl From<&centcom_common::SyncConfig> for EngineOptions {
    fn from(config: &centcom_common::SyncConfig) -> Self {
        Self {
            recent_window: config.recent_window,
            max_pages: config.max_pages,
        }
    }
}

/// Outcome of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    /// Deduplicated bans in fetch order
    pub bans: Vec<Ban>,
    /// Records dropped because they failed normalization
    pub skipped: usize,
    /// Last page an incremental crawl fetched; `None` for full crawls
    pub last_page: Option<u32>,
    /// Why an incremental crawl stopped; `None` for full crawls
    pub stop: Option<StopReason>,
}

/// Crawl driver for one parser
///
/// Holds no mutable state; every crawl builds its own result list.
pub struct SyncEngine<P: BanParser> {
    parser: P,
    store: Arc<dyn BanRepository>,
    options: EngineOptions,
    cancel: CancellationToken,
}

impl<P: BanParser> SyncEngine<P> {
    /// Create an engine, rejecting unusable configuration up front
    pub fn new(parser: P, store: Arc<dyn BanRepository>, options: EngineOptions) -> SyncResult<Self> {
        if parser.name().trim().is_empty() {
            return Err(SyncError::InvalidOptions("parser name is empty".to_string()));
        }
        if options.recent_window < 1 {
            return Err(SyncError::InvalidOptions(format!(
                "recent window must be at least 1, got {}",
                options.recent_window
            )));
        }
        if options.max_pages == Some(0) {
            return Err(SyncError::InvalidOptions("max pages must be at least 1".to_string()));
        }

        Ok(Self {
            parser,
            store,
            options,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort crawls between pages once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn name(&self) -> &str {
        self.parser.name()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Source names served by the parser
    pub fn source_names(&self) -> Vec<String> {
        self.parser.sources().names()
    }

    /// Fetch every ban the source exposes
    ///
    /// Calls the parser's full fetch once per sub-source and attributes each
    /// record to that sub-source. Storage is not consulted.
    pub async fn fetch_all_bans(&self) -> SyncResult<Vec<Ban>> {
        Ok(self.crawl_all().await?.bans)
    }

    /// Full crawl, reporting how many records were skipped
    #[instrument(skip(self), fields(parser = %self.parser.name()))]
    pub async fn crawl_all(&self) -> SyncResult<CrawlReport> {
        info!("Fetching all bans");

        let mut found = Vec::new();
        let mut skipped = 0;
        for source in self.parser.sources().iter() {
            self.check_cancelled()?;

            let records = self.parser.fetch_all(source, &self.cancel).await?;
            // A cancelled fetch may have returned early with a partial list
            self.check_cancelled()?;

            let received = records.len();
            let accepted = self.normalize_into(records, Some(source), &mut found);
            skipped += received - accepted;
            debug!(source = %source.name, received, accepted, "Fetched source");
        }

        let bans = dedup_bans(found);
        info!(count = bans.len(), skipped, "Fetched all bans");
        Ok(CrawlReport {
            bans,
            skipped,
            last_page: None,
            stop: None,
        })
    }

    /// Normalize records and append the ones that succeed
    ///
    /// With `source` set every record is attributed to it; otherwise each
    /// record's source is resolved through the registry. Returns the number of
    /// records appended.
    fn normalize_into(
        &self,
        records: Vec<P::Record>,
        source: Option<&BanSource>,
        out: &mut Vec<Ban>,
    ) -> usize {
        let before = out.len();
        for record in records {
            match self.normalize_record(record, source) {
                Ok(ban) => out.push(ban),
                Err(e) => warn!(parser = %self.parser.name(), error = %e, "Skipping ban record"),
            }
        }
        out.len() - before
    }

    fn normalize_record(
        &self,
        record: P::Record,
        source: Option<&BanSource>,
    ) -> Result<Ban, NormalizeError> {
        let source = match source {
            Some(source) => source,
            None => self.parser.sources().resolve(self.parser.source_key(&record))?,
        };

        let ban = self.parser.normalize(record, source)?;
        if self.parser.supports_ban_ids() && ban.ban_id.as_deref().map_or(true, str::is_empty) {
            return Err(NormalizeError::MissingBanId);
        }
        Ok(ban)
    }

    fn check_cancelled(&self) -> SyncResult<()> {
        if self.cancel.is_cancelled() {
            warn!(parser = %self.parser.name(), "Crawl cancelled");
            return Err(SyncError::Cancelled {
                parser: self.parser.name().to_string(),
            });
        }
        Ok(())
    }
}
