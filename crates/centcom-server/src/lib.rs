//! # centcom-server
//!
//! Wires configuration, storage, and ban sources together and keeps every
//! enabled source synchronized until shutdown.

pub mod scheduler;

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use centcom_common::{AppConfig, AppError, AppResult};
use centcom_core::{BanRepository, BanSourceRepository};
use centcom_db::{create_pool, ensure_schema, DatabaseConfig, PgBanRepository, PgBanSourceRepository};
use centcom_sync::{
    ensure_disjoint, BanImporter, BubberBanParser, BubberBanService, EngineOptions, SyncEngine,
};

pub use scheduler::{choose_mode, run_job, SyncJob};

/// Build every enabled sync job and run them until Ctrl-C
pub async fn run(config: AppConfig) -> AppResult<()> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(AppError::database)?;
    ensure_schema(&pool).await.map_err(AppError::database)?;
    info!("PostgreSQL connection established");

    let bans: Arc<dyn BanRepository> = Arc::new(PgBanRepository::new(pool.clone()));
    let sources: Arc<dyn BanSourceRepository> = Arc::new(PgBanSourceRepository::new(pool));
    let importer = BanImporter::new(Arc::clone(&bans), sources);

    let cancel = CancellationToken::new();
    let options = EngineOptions::from(&config.sync);

    let bubber = if config.sources.bubber.enabled {
        let service = BubberBanService::new(config.sources.bubber.base_url.clone(), &config.http)
            .map_err(AppError::sync)?;
        let parser = BubberBanParser::new(service).map_err(AppError::sync)?;
        let engine = SyncEngine::new(parser, Arc::clone(&bans), options)
            .map_err(AppError::sync)?
            .with_cancellation(cancel.clone());
        Some(SyncJob::new(engine, importer.clone(), &config.sync))
    } else {
        info!("Bubberstation source disabled");
        None
    };

    ensure_disjoint(bubber.iter().map(SyncJob::registry)).map_err(AppError::sync)?;

    let mut tasks = JoinSet::new();
    if let Some(job) = bubber {
        tasks.spawn(run_job(job, cancel.clone()));
    }

    if tasks.is_empty() {
        warn!("No ban sources enabled, nothing to do");
        return Ok(());
    }
    info!(jobs = tasks.len(), "Sync jobs started");

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        shutdown.cancel();
    });

    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!(error = %e, "Sync job panicked");
        }
    }

    info!("All sync jobs stopped");
    Ok(())
}
