//! # centcom-db
//!
//! Database layer implementing the persistence traits of `centcom-core` with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and schema bootstrap
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use centcom_db::{create_pool, ensure_schema, DatabaseConfig, PgBanRepository};
//! use centcom_core::BanRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::from_env()).await?;
//!     ensure_schema(&pool).await?;
//!     let bans = PgBanRepository::new(pool);
//!     let recent = bans.recent_bans(&["bubberstation".to_string()], 5).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, ensure_schema, DatabaseConfig, PgPool};
pub use repositories::{PgBanRepository, PgBanSourceRepository};
