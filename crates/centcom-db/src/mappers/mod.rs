//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod ban;
mod ban_source;

pub use ban::{group_job_bans, stored_ban_from_model, BanInsert};
