//! Repository implementations
//!
//! PostgreSQL implementations of the persistence traits defined in centcom-core.

mod ban;
mod ban_source;
mod error;

pub use ban::PgBanRepository;
pub use ban_source::PgBanSourceRepository;
