//! Error handling utilities for repositories

use campus_core::error::DomainError;
use campus_core::value_objects::MessageId;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "message not found" error
pub fn message_not_found(id: MessageId) -> DomainError {
    DomainError::MessageNotFound(id)
}
