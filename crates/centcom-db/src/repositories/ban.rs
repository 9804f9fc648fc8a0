//! PostgreSQL implementation of BanRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use centcom_core::entities::{Ban, StoredBan};
use centcom_core::traits::{BanRepository, RepoResult};

use crate::mappers::{group_job_bans, stored_ban_from_model, BanInsert};
use crate::models::{BanModel, JobBanModel};

use super::error::{ban_not_found, map_db_error, source_not_found};

/// Columns selected for every ban read, joined with the owning source
const BAN_SELECT: &str = r"
    SELECT b.id, b.ban_id, b.ckey, b.banned_on, b.banned_by, b.ban_type,
           b.expires, b.reason, b.unbanned_by,
           s.name AS source_name, s.display AS source_display,
           s.roleplay_level AS source_roleplay_level
    FROM bans b
    JOIN ban_sources s ON s.id = b.source_id
";

/// PostgreSQL implementation of BanRepository
#[derive(Clone)]
pub struct PgBanRepository {
    pool: PgPool,
}

impl PgBanRepository {
    /// Create a new PgBanRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load job bans for the given rows and build stored bans
    async fn attach_job_bans(&self, rows: Vec<BanModel>) -> RepoResult<Vec<StoredBan>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let job_rows = sqlx::query_as::<_, JobBanModel>(
            r"
            SELECT parent_ban_id, job
            FROM job_bans
            WHERE parent_ban_id = ANY($1)
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut jobs = group_job_bans(job_rows);
        rows.into_iter()
            .map(|row| {
                let row_jobs = jobs.remove(&row.id).unwrap_or_default();
                stored_ban_from_model(row, row_jobs)
            })
            .collect()
    }
}

/// Resolve source names to row ids
async fn source_ids<'a>(
    conn: &mut PgConnection,
    bans: impl Iterator<Item = &'a Ban>,
) -> RepoResult<HashMap<String, i32>> {
    let mut names: Vec<String> = bans.map(|ban| ban.source.name.clone()).collect();
    names.sort_unstable();
    names.dedup();

    let rows = sqlx::query_as::<_, (i32, String)>(
        r"
        SELECT id, name FROM ban_sources WHERE name = ANY($1)
        ",
    )
    .bind(&names[..])
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(rows.into_iter().map(|(id, name)| (name, id)).collect())
}

fn lookup_source(ids: &HashMap<String, i32>, name: &str) -> RepoResult<i32> {
    ids.get(name).copied().ok_or_else(|| source_not_found(name))
}

async fn insert_job_bans(conn: &mut PgConnection, parent_id: i64, jobs: &[String]) -> RepoResult<()> {
    if jobs.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO job_bans (parent_ban_id, job)
        SELECT $1, UNNEST($2::text[])
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(parent_id)
    .bind(jobs)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[async_trait]
impl BanRepository for PgBanRepository {
    #[instrument(skip(self))]
    async fn recent_bans(&self, source_names: &[String], limit: i64) -> RepoResult<Vec<Ban>> {
        let sql = format!("{BAN_SELECT} WHERE s.name = ANY($1) ORDER BY b.banned_on DESC LIMIT $2");
        let rows = sqlx::query_as::<_, BanModel>(&sql)
            .bind(source_names)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let stored = self.attach_job_bans(rows).await?;
        Ok(stored.into_iter().map(|s| s.ban).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_sources(&self, source_names: &[String]) -> RepoResult<Vec<StoredBan>> {
        let sql = format!("{BAN_SELECT} WHERE s.name = ANY($1) ORDER BY b.banned_on DESC, b.id DESC");
        let rows = sqlx::query_as::<_, BanModel>(&sql)
            .bind(source_names)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.attach_job_bans(rows).await
    }

    #[instrument(skip(self))]
    async fn count_by_sources(&self, source_names: &[String]) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM bans b
            JOIN ban_sources s ON s.id = b.source_id
            WHERE s.name = ANY($1)
            ",
        )
        .bind(source_names)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, bans), fields(count = bans.len()))]
    async fn insert_bans(&self, bans: &[Ban]) -> RepoResult<u64> {
        if bans.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let sources = source_ids(&mut tx, bans.iter()).await?;
        let mut inserted = 0u64;

        for ban in bans {
            let row = BanInsert::new(ban);
            let source_id = lookup_source(&sources, row.source_name)?;

            let id = sqlx::query_scalar::<_, i64>(
                r"
                INSERT INTO bans (source_id, ban_id, ckey, banned_on, banned_by, ban_type,
                                  expires, reason, unbanned_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (source_id, ban_id) DO NOTHING
                RETURNING id
                ",
            )
            .bind(source_id)
            .bind(row.ban_id)
            .bind(row.ckey)
            .bind(row.banned_on)
            .bind(row.banned_by)
            .bind(row.ban_type)
            .bind(row.expires)
            .bind(row.reason)
            .bind(row.unbanned_by)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

            match id {
                Some(id) => {
                    insert_job_bans(&mut tx, id, &row.jobs).await?;
                    inserted += 1;
                }
                None => debug!(ban_id = ?row.ban_id, source = row.source_name, "Ban already stored"),
            }
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(inserted)
    }

    #[instrument(skip(self, bans), fields(count = bans.len()))]
    async fn update_bans(&self, bans: &[StoredBan]) -> RepoResult<u64> {
        if bans.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let sources = source_ids(&mut tx, bans.iter().map(|stored| &stored.ban)).await?;

        for stored in bans {
            let row = BanInsert::new(&stored.ban);
            let source_id = lookup_source(&sources, row.source_name)?;

            let result = sqlx::query(
                r"
                UPDATE bans
                SET source_id = $2, ban_id = $3, ckey = $4, banned_on = $5, banned_by = $6,
                    ban_type = $7, expires = $8, reason = $9, unbanned_by = $10
                WHERE id = $1
                ",
            )
            .bind(stored.id)
            .bind(source_id)
            .bind(row.ban_id)
            .bind(row.ckey)
            .bind(row.banned_on)
            .bind(row.banned_by)
            .bind(row.ban_type)
            .bind(row.expires)
            .bind(row.reason)
            .bind(row.unbanned_by)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(ban_not_found(stored.id));
            }

            sqlx::query("DELETE FROM job_bans WHERE parent_ban_id = $1")
                .bind(stored.id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            insert_job_bans(&mut tx, stored.id, &row.jobs).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(bans.len() as u64)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_bans(&self, ids: &[i64]) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM bans WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
