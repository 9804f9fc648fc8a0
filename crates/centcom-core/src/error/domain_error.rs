//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Ban source not found: {0}")]
    SourceNotFound(String),

    #[error("Ban not found: {0}")]
    BanNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid ckey: {0:?}")]
    InvalidCKey(String),

    #[error("Invalid roleplay level: {0}")]
    InvalidRoleplayLevel(i16),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "UNKNOWN_SOURCE",
            Self::BanNotFound(_) => "UNKNOWN_BAN",
            Self::InvalidCKey(_) => "INVALID_CKEY",
            Self::InvalidRoleplayLevel(_) => "INVALID_ROLEPLAY_LEVEL",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound(_) | Self::BanNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidCKey(_) | Self::InvalidRoleplayLevel(_) | Self::ValidationError(_)
        )
    }
}
