//! # centcom-sync
//!
//! Ban source synchronization engine.
//!
//! Every remote ban list is wrapped in a [`BanParser`]: it declares the
//! sources it serves, fetches raw pages, and normalizes raw records into
//! canonical [`Ban`](centcom_core::Ban)s. [`SyncEngine`] drives the crawls
//! on top of that contract and [`BanImporter`] writes the results through
//! the persistence traits of `centcom-core`.
//!
//! ```rust,ignore
//! let parser = BubberBanParser::new(BubberBanService::new(base_url, &http)?)?;
//! let engine = SyncEngine::new(parser, bans.clone(), EngineOptions::default())?;
//! let summary = BanImporter::new(bans, sources)
//!     .import(&engine, ImportMode::Incremental)
//!     .await?;
//! ```

pub mod engine;
pub mod error;
pub mod import;
pub mod parser;
pub mod registry;
pub mod sources;

pub use engine::{dedup_bans, CrawlReport, EngineOptions, StopReason, SyncEngine};
pub use error::{FetchError, NormalizeError, RegistryError, SyncError, SyncResult};
pub use import::{reconcile, BanImporter, ImportMode, ImportSummary, ReconcilePlan};
pub use parser::BanParser;
pub use registry::{ensure_disjoint, SourceRegistry, SourceRegistryBuilder};
pub use sources::bubber::{BubberBanParser, BubberBanService};
