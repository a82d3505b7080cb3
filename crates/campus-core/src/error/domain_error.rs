//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MessageId, PostId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Chatroom not found")]
    ChatroomNotFound(PostId),

    #[error("Message not found")]
    MessageNotFound(MessageId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Message body cannot be empty")]
    EmptyBody,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("File too large: max {max_bytes} bytes")]
    FileTooLarge { max_bytes: u64 },

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You can only delete your own messages")]
    NotMessageAuthor,

    #[error("Cannot delete messages older than {minutes} minutes")]
    DeleteWindowExpired { minutes: i64 },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ChatroomNotFound(_) => "UNKNOWN_CHATROOM",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyBody => "EMPTY_MESSAGE",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",

            // Authorization
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::DeleteWindowExpired { .. } => "DELETE_WINDOW_EXPIRED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ChatroomNotFound(_) | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyBody
                | Self::ContentTooLong { .. }
                | Self::FileTooLarge { .. }
                | Self::UnsupportedMediaType(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotMessageAuthor | Self::DeleteWindowExpired { .. }
        )
    }
}
