//! Error handling utilities for repositories

use centcom_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "source not found" error
pub fn source_not_found(name: &str) -> DomainError {
    DomainError::SourceNotFound(name.to_string())
}

/// Create a "ban not found" error
pub fn ban_not_found(id: i64) -> DomainError {
    DomainError::BanNotFound(id)
}
