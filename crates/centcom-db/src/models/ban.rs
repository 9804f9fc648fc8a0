//! Ban database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row from `bans` joined with its `ban_sources` row
#[derive(Debug, Clone, FromRow)]
pub struct BanModel {
    pub id: i64,
    pub ban_id: Option<String>,
    pub ckey: String,
    pub banned_on: DateTime<Utc>,
    pub banned_by: String,
    pub ban_type: i16,
    pub expires: Option<DateTime<Utc>>,
    pub reason: String,
    pub unbanned_by: Option<String>,
    pub source_name: String,
    pub source_display: String,
    pub source_roleplay_level: i16,
}
