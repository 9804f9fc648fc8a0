//! Value objects - immutable domain primitives

mod ckey;
mod roleplay_level;

pub use ckey::CKey;
pub use roleplay_level::RoleplayLevel;
