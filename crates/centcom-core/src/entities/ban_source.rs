//! Ban source entity - one logical remote ban list

use serde::{Deserialize, Serialize};

use crate::value_objects::RoleplayLevel;

/// A logical ban list that records are attributed to
///
/// `name` is unique across every registered parser and is the key storage
/// uses to link ban rows to their source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BanSource {
    pub name: String,
    pub display: String,
    pub roleplay_level: RoleplayLevel,
}

impl BanSource {
    /// Create a new BanSource
    pub fn new(
        name: impl Into<String>,
        display: impl Into<String>,
        roleplay_level: RoleplayLevel,
    ) -> Self {
        Self {
            name: name.into(),
            display: display.into(),
            roleplay_level,
        }
    }
}
