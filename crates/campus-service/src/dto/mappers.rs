//! Entity to DTO mappers
//!
//! Sender details are looked up when a message is rendered, so a renamed
//! user shows their current name in both the live feed and the history.

use campus_core::entities::{ChatMessage, ChatUser};
use campus_core::{UserId, REDACTION_MARKER, UNKNOWN_USER_NAME};
use chrono::{DateTime, SecondsFormat, Utc};

use super::responses::{ChatEnvelope, EnvelopeKind, HistoryMessage};

/// Render a timestamp the way clients expect it: RFC 3339, UTC, whole seconds
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Message paired with its author, if the author still exists
#[derive(Debug, Clone)]
pub struct MessageWithAuthor {
    pub message: ChatMessage,
    pub author: Option<ChatUser>,
}

impl MessageWithAuthor {
    pub fn new(message: ChatMessage, author: Option<ChatUser>) -> Self {
        Self { message, author }
    }

    /// Pick the author out of a batch lookup
    pub fn from_lookup(message: ChatMessage, users: &[ChatUser]) -> Self {
        let author = users.iter().find(|u| u.id == message.author_id).cloned();
        Self::new(message, author)
    }

    fn user_id(&self) -> UserId {
        self.message.author_id
    }

    fn user_name(&self) -> String {
        self.author
            .as_ref()
            .map_or_else(|| UNKNOWN_USER_NAME.to_string(), ChatUser::display_name)
    }

    fn user_avatar(&self) -> String {
        self.author
            .as_ref()
            .map(|u| u.avatar().to_string())
            .unwrap_or_default()
    }

    fn sut_id(&self) -> String {
        self.author
            .as_ref()
            .map(|u| u.sut_id.clone())
            .unwrap_or_default()
    }

    /// Envelope announcing that this message was deleted
    ///
    /// Keeps the original id, author and creation time.
    pub fn into_delete_envelope(self) -> ChatEnvelope {
        let mut envelope = ChatEnvelope::from(self);
        envelope.body = REDACTION_MARKER.to_string();
        envelope.kind = EnvelopeKind::Delete;
        envelope
    }
}

impl From<MessageWithAuthor> for ChatEnvelope {
    fn from(value: MessageWithAuthor) -> Self {
        Self {
            id: value.message.id,
            user_id: value.user_id(),
            user_name: value.user_name(),
            user_avatar: value.user_avatar(),
            sut_id: value.sut_id(),
            chat_room_id: value.message.room_id,
            created_at: format_timestamp(value.message.created_at),
            kind: value.message.kind.into(),
            body: value.message.body,
        }
    }
}

impl From<MessageWithAuthor> for HistoryMessage {
    fn from(value: MessageWithAuthor) -> Self {
        Self {
            id: value.message.id,
            user_id: value.user_id(),
            user_name: value.user_name(),
            user_avatar: value.user_avatar(),
            sut_id: value.sut_id(),
            created_at: format_timestamp(value.message.created_at),
            chat_room_id: value.message.room_id,
            kind: value.message.kind.code(),
            body: value.message.body,
        }
    }
}
