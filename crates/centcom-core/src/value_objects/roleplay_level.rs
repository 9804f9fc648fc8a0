//! Roleplay level - moderation strictness tier of a ban source

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Roleplay strictness tier, used for grouping sources in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum RoleplayLevel {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

impl RoleplayLevel {
    /// Get the stored ordinal
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl TryFrom<i16> for RoleplayLevel {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            other => Err(DomainError::InvalidRoleplayLevel(other)),
        }
    }
}

impl From<RoleplayLevel> for i16 {
    fn from(level: RoleplayLevel) -> Self {
        level as i16
    }
}

impl fmt::Display for RoleplayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(name)
    }
}
