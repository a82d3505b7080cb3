//! Handler error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campus_common::AppError;
use campus_core::{DomainError, PostId};
use campus_service::ServiceError;
use serde_json::json;
use thiserror::Error;

use crate::hub::HubStopped;
use crate::protocol::CloseCode;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Missing, invalid or expired token
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(#[from] AppError),

    /// Handshake from a browser origin that is not configured
    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    /// The post has no chat room
    #[error("Chatroom not found")]
    RoomNotFound(PostId),

    /// Content rejected by validation
    #[error("Message rejected: {0}")]
    Rejected(ServiceError),

    /// Store or other service failure
    #[error("Service error: {0}")]
    Service(ServiceError),

    #[error(transparent)]
    HubStopped(#[from] HubStopped),
}

impl HandlerError {
    /// Classify a service failure
    pub fn from_service(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(DomainError::ChatroomNotFound(post_id)) => {
                Self::RoomNotFound(post_id)
            }
            err if err.status_code() == 400 => Self::Rejected(err),
            err => Self::Service(err),
        }
    }

    /// Close code to end the connection with, or `None` to keep it open
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) => Some(CloseCode::DecodeError),
            Self::AuthenticationFailed(_) | Self::OriginNotAllowed(_) => {
                Some(CloseCode::AuthenticationFailed)
            }
            Self::RoomNotFound(_) => Some(CloseCode::RoomNotFound),
            Self::HubStopped(_) => Some(CloseCode::UnknownError),
            Self::Rejected(_) | Self::Service(_) => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) | Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            Self::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::HubStopped(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Service(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn code(&self) -> &str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::AuthenticationFailed(err) => err.error_code(),
            Self::OriginNotAllowed(_) => "ORIGIN_NOT_ALLOWED",
            Self::RoomNotFound(_) => "UNKNOWN_CHATROOM",
            Self::Rejected(err) | Self::Service(err) => err.error_code(),
            Self::HubStopped(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

/// Rejections before the upgrade use the same body as the REST API
impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::AuthenticationFailed(err) => err.to_string(),
            Self::Service(err) if status.is_server_error() => {
                tracing::error!(error = %err, "Lobby request failed");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
