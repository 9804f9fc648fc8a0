//! Periodic import loop, one per parser

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use centcom_common::SyncConfig;
use centcom_sync::{BanImporter, BanParser, ImportMode, SourceRegistry, SyncEngine, SyncError};

/// Pick the import mode for the next run
///
/// A parser whose sources have nothing stored yet always gets a complete
/// import, as does one whose refresh deadline has passed.
pub fn choose_mode(has_bans: bool, now: Instant, next_full: Instant) -> ImportMode {
    if !has_bans || now >= next_full {
        ImportMode::Complete
    } else {
        ImportMode::Incremental
    }
}

/// Everything needed to keep one parser's sources synchronized
pub struct SyncJob<P: BanParser> {
    engine: SyncEngine<P>,
    importer: BanImporter,
    interval: Duration,
    full_refresh_interval: Duration,
}

impl<P: BanParser> SyncJob<P> {
    pub fn new(engine: SyncEngine<P>, importer: BanImporter, config: &SyncConfig) -> Self {
        Self {
            engine,
            importer,
            interval: config.interval(),
            full_refresh_interval: config.full_refresh_interval(),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.engine.parser().sources()
    }

    /// Run one import; returns the new full refresh deadline
    #[instrument(skip(self), fields(parser = %self.engine.name()))]
    async fn tick(&self, next_full: Instant) -> Instant {
        let has_bans = match self.importer.has_bans(&self.engine).await {
            Ok(has_bans) => has_bans,
            Err(e) => {
                error!(error = %e, "Failed to inspect stored bans");
                return next_full;
            }
        };

        let now = Instant::now();
        let mode = choose_mode(has_bans, now, next_full);

        match self.importer.import(&self.engine, mode).await {
            Ok(summary) if summary.mode == ImportMode::Complete => now + self.full_refresh_interval,
            Ok(_) => next_full,
            Err(SyncError::Cancelled { .. }) => {
                info!("Import interrupted by shutdown");
                next_full
            }
            Err(e) => {
                error!(error = %e, %mode, transient = e.is_transient(), "Import failed");
                next_full
            }
        }
    }
}

/// Import on every interval tick until `cancel` fires
///
/// Runs of one job never overlap; a run that outlasts the interval delays
/// the next tick instead of queueing a burst.
pub async fn run_job<P: BanParser + 'static>(job: SyncJob<P>, cancel: CancellationToken) {
    let mut ticker = time::interval(job.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut next_full = Instant::now() + job.full_refresh_interval;

    info!(parser = %job.engine.name(), interval = ?job.interval, "Sync job started");

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        next_full = job.tick(next_full).await;
    }

    info!(parser = %job.engine.name(), "Sync job stopped");
}
