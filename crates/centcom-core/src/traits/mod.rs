//! Domain traits (ports)

mod repositories;

pub use repositories::{BanRepository, BanSourceRepository, RepoResult};
