//! Ban source database model

use sqlx::FromRow;

/// Database model for ban_sources table
#[derive(Debug, Clone, FromRow)]
pub struct BanSourceModel {
    pub id: i32,
    pub name: String,
    pub display: String,
    pub roleplay_level: i16,
}
