//! Domain entities - canonical ban records

mod ban;
mod ban_source;
mod job_ban;

pub use ban::{Ban, BanType, DedupKey, StoredBan};
pub use ban_source::BanSource;
pub use job_ban::JobBan;
