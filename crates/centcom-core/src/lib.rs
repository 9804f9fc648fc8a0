//! # centcom-core
//!
//! Domain layer containing the canonical ban model, value objects, and the
//! persistence traits the synchronization engine reads from and writes to.
//! This crate has zero dependencies on infrastructure (database, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Ban, BanSource, BanType, DedupKey, JobBan, StoredBan};
pub use error::DomainError;
pub use traits::{BanRepository, BanSourceRepository, RepoResult};
pub use value_objects::{CKey, RoleplayLevel};
