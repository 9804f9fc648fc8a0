//! Job ban database model

use sqlx::FromRow;

/// Database model for job_bans table
#[derive(Debug, Clone, FromRow)]
pub struct JobBanModel {
    pub parent_ban_id: i64,
    pub job: String,
}
