//! Database models - SQLx-compatible structs for PostgreSQL tables

mod ban;
mod ban_source;
mod job_ban;

pub use ban::BanModel;
pub use ban_source::BanSourceModel;
pub use job_ban::JobBanModel;
