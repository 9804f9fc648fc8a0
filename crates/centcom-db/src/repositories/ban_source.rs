//! PostgreSQL implementation of BanSourceRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use centcom_core::entities::BanSource;
use centcom_core::traits::{BanSourceRepository, RepoResult};

use crate::models::BanSourceModel;

use super::error::map_db_error;

/// PostgreSQL implementation of BanSourceRepository
#[derive(Clone)]
pub struct PgBanSourceRepository {
    pool: PgPool,
}

impl PgBanSourceRepository {
    /// Create a new PgBanSourceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BanSourceRepository for PgBanSourceRepository {
    #[instrument(skip(self, sources), fields(count = sources.len()))]
    async fn ensure_sources(&self, sources: &[BanSource]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for source in sources {
            sqlx::query(
                r"
                INSERT INTO ban_sources (name, display, roleplay_level)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO UPDATE SET display = $2, roleplay_level = $3
                ",
            )
            .bind(&source.name)
            .bind(&source.display)
            .bind(source.roleplay_level.as_i16())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<BanSource>> {
        let rows = sqlx::query_as::<_, BanSourceModel>(
            r"
            SELECT id, name, display, roleplay_level
            FROM ban_sources
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(BanSource::try_from).collect()
    }
}
