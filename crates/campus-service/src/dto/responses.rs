//! Response DTOs
//!
//! `ChatEnvelope` is the WebSocket wire format; its keys are fixed by the
//! existing web and mobile clients.

use campus_core::{MessageId, MessageKind, RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmation text returned by a successful delete
pub const DELETE_SUCCESS_MESSAGE: &str = "Message deleted successfully";

// ============================================================================
// Chat Responses
// ============================================================================

/// Event type tag carried by an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Text,
    Image,
    File,
    /// Control event: the message with this envelope's id was deleted
    Delete,
}

impl From<MessageKind> for EnvelopeKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => Self::Text,
            MessageKind::Image => Self::Image,
            MessageKind::File => Self::File,
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Delete => "delete",
        })
    }
}

/// Message as delivered to room members over the WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    #[serde(rename = "ID")]
    pub id: MessageId,
    pub body: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_avatar: String,
    pub chat_room_id: RoomId,
    /// RFC 3339, UTC, second precision
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    pub sut_id: String,
}

impl ChatEnvelope {
    /// Check whether this is a deletion control event
    pub fn is_delete(&self) -> bool {
        self.kind == EnvelopeKind::Delete
    }
}

/// Entry of the room history endpoint
///
/// Same fields as the envelope, except `type` is the numeric type id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "ID")]
    pub id: MessageId,
    pub body: String,
    pub user_id: UserId,
    pub user_name: String,
    pub user_avatar: String,
    pub sut_id: String,
    pub created_at: String,
    pub chat_room_id: RoomId,
    #[serde(rename = "type")]
    pub kind: i32,
}

/// Result of a successful delete: the event to broadcast and where
#[derive(Debug, Clone)]
pub struct DeletedMessage {
    pub room_id: RoomId,
    pub envelope: ChatEnvelope,
}

/// Body of a successful `DELETE /chat/message/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteMessageResponse {
    pub message: String,
    pub id: MessageId,
}

impl DeleteMessageResponse {
    pub fn new(id: MessageId) -> Self {
        Self {
            message: DELETE_SUCCESS_MESSAGE.to_string(),
            id,
        }
    }
}

/// Location of a stored upload, relative to the server root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: ReadinessChecks,
}

/// Status of each dependency
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessChecks {
    pub database: String,
    pub hub: String,
}

impl ReadinessResponse {
    /// `database` is `None` when the server runs without a pool
    pub fn ready(database_healthy: Option<bool>, hub_running: bool) -> Self {
        let all_healthy = database_healthy.unwrap_or(true) && hub_running;
        let database = match database_healthy {
            Some(true) => "healthy",
            Some(false) => "unhealthy",
            None => "not_configured",
        };
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: ReadinessChecks {
                database: database.to_string(),
                hub: if hub_running { "running" } else { "stopped" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
