//! Incremental crawl with overlap-based stopping
//!
//! Remote sources expose no reliable "since" cursor. Instead the engine pages
//! from the newest records until a page yields a ban that is already among the
//! most recently stored ones, and assumes everything older is known too.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use centcom_core::{Ban, DedupKey};

use super::{dedup_bans, CrawlReport, SyncEngine};
use crate::error::{SyncError, SyncResult};
use crate::parser::BanParser;

/// Why an incremental crawl stopped paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned an empty page
    Exhausted,
    /// A page contained a ban from the known window
    Overlap,
    /// The configured page limit was reached
    PageLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Exhausted => "exhausted",
            Self::Overlap => "overlap",
            Self::PageLimit => "page_limit",
        };
        f.write_str(reason)
    }
}

/// Snapshot of recently stored ban keys, captured once per crawl
struct KnownWindow {
    keys: HashSet<DedupKey>,
}

impl KnownWindow {
    fn new(recent: &[Ban]) -> Self {
        Self {
            keys: recent.iter().filter_map(Ban::dedup_key).collect(),
        }
    }

    fn knows(&self, ban: &Ban) -> bool {
        ban.dedup_key().is_some_and(|key| self.keys.contains(&key))
    }

    fn recognizes(&self, bans: &[Ban]) -> bool {
        bans.iter().any(|ban| self.knows(ban))
    }
}

impl<P: BanParser> SyncEngine<P> {
    /// Fetch bans not yet known to storage
    ///
    /// Reads the most recent stored bans once, then requests pages from 1
    /// upward. Paging stops on an empty page, on the first page containing a
    /// known ban (that page is kept whole), or at the page limit. The result
    /// preserves fetch order and holds each `(source, ban_id)` once. A crawl
    /// that turns up nothing outside the known window returns nothing.
    ///
    /// Sources without stable ban ids cannot be crawled this way and return
    /// [`SyncError::IncrementalUnsupported`].
    pub async fn fetch_new_bans(&self) -> SyncResult<Vec<Ban>> {
        Ok(self.crawl_new().await?.bans)
    }

    /// Incremental crawl, reporting skipped records, the last page fetched,
    /// and why paging stopped
    #[instrument(skip(self), fields(parser = %self.parser.name()))]
    pub async fn crawl_new(&self) -> SyncResult<CrawlReport> {
        if !self.parser.supports_ban_ids() {
            return Err(SyncError::IncrementalUnsupported {
                parser: self.parser.name().to_string(),
            });
        }

        info!("Fetching new bans");

        let recent = self
            .store
            .recent_bans(&self.source_names(), self.options.recent_window)
            .await?;
        let window = KnownWindow::new(&recent);
        debug!(known = window.keys.len(), "Captured recent window");

        let mut found = Vec::new();
        let mut skipped = 0;
        let mut last_page = 0;
        let stop = loop {
            let page = last_page + 1;
            self.check_cancelled()?;

            if matches!(self.options.max_pages, Some(max) if page > max) {
                warn!(max_pages = last_page, "Page limit reached before overlap");
                break StopReason::PageLimit;
            }

            let records = self.parser.fetch_page(page).await?;
            last_page = page;
            if records.is_empty() {
                break StopReason::Exhausted;
            }

            let received = records.len();
            let start = found.len();
            let accepted = self.normalize_into(records, None, &mut found);
            skipped += received - accepted;
            debug!(page, received, accepted, "Fetched page");

            // Earlier pages were already checked, so only the new slice matters
            if window.recognizes(&found[start..]) {
                break StopReason::Overlap;
            }
        };

        let bans = if found.iter().all(|ban| window.knows(ban)) {
            Vec::new()
        } else {
            dedup_bans(found)
        };
        info!(count = bans.len(), skipped, last_page, stop = %stop, "Fetched new bans");
        Ok(CrawlReport {
            bans,
            skipped,
            last_page: Some(last_page),
            stop: Some(stop),
        })
    }
}
