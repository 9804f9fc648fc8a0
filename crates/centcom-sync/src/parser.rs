//! Parser contract implemented once per remote ban source
//!
//! A parser only knows how to talk to its source and how to read the source's
//! record shape. Paging policy, stopping, and deduplication live in
//! [`SyncEngine`](crate::SyncEngine).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use centcom_core::{Ban, BanSource};

use crate::error::{FetchError, NormalizeError};
use crate::registry::SourceRegistry;

#[async_trait]
pub trait BanParser: Send + Sync {
    /// Raw, source-native record returned by the fetch service
    type Record: Send + 'static;

    /// Display name used in logs
    fn name(&self) -> &str;

    /// Whether raw records carry an id that is stable across fetches
    fn supports_ban_ids(&self) -> bool;

    /// Sub-sources served by this parser
    fn sources(&self) -> &SourceRegistry;

    /// Fetch one page of records, newest first. Pages start at 1 and an
    /// empty page means there is no more data.
    async fn fetch_page(&self, page: u32) -> Result<Vec<Self::Record>, FetchError>;

    /// Fetch every record belonging to `source`
    ///
    /// The default pages from 1 until an empty page and keeps the records
    /// that resolve to `source`. Sources with a bulk endpoint override this.
    ///
    /// Implementations stop requesting once `cancel` fires; the partial
    /// result is discarded by the engine.
    async fn fetch_all(
        &self,
        source: &BanSource,
        cancel: &CancellationToken,
    ) -> Result<Vec<Self::Record>, FetchError> {
        let mut records = Vec::new();
        let mut page = 1;
        while !cancel.is_cancelled() {
            let batch = self.fetch_page(page).await?;
            if batch.is_empty() {
                break;
            }
            records.extend(batch.into_iter().filter(|record| {
                self.sources()
                    .resolve(self.source_key(record))
                    .is_ok_and(|resolved| resolved.name == source.name)
            }));
            page += 1;
        }
        Ok(records)
    }

    /// Key of the sub-source a record belongs to; `None` means the primary source
    fn source_key<'r>(&self, _record: &'r Self::Record) -> Option<&'r str> {
        None
    }

    /// Map a raw record onto the canonical model
    ///
    /// Must not fail for fields it does not understand; those are dropped.
    fn normalize(&self, record: Self::Record, source: &BanSource) -> Result<Ban, NormalizeError>;
}
