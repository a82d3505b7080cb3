//! Chat message entity - a message persisted in a room

use chrono::{DateTime, Duration, Utc};

use crate::value_objects::{MessageId, MessageKind, RoomId, UserId};

/// Maximum message body length, in characters
pub const MAX_BODY_CHARS: usize = 1000;

/// Body written over a message when its author deletes it
pub const REDACTION_MARKER: &str = "[DELETED]";

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub author_id: UserId,
    pub body: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Check whether `requester` wrote this message
    #[inline]
    pub fn is_authored_by(&self, requester: UserId) -> bool {
        self.author_id == requester
    }

    /// Time elapsed since creation, as seen at `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.created_at)
    }

    /// Check whether the message can still be deleted at `now`
    ///
    /// The window is inclusive: a message exactly `window` old is deletable.
    pub fn within_delete_window(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age_at(now) <= window
    }

    /// Check whether the body has been redacted
    #[inline]
    pub fn is_redacted(&self) -> bool {
        self.body == REDACTION_MARKER
    }
}

/// A message that has not been stored yet
///
/// The id and timestamps are assigned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub room_id: RoomId,
    pub author_id: UserId,
    pub body: String,
    pub kind: MessageKind,
}

impl NewChatMessage {
    pub fn new(room_id: RoomId, author_id: UserId, body: String, kind: MessageKind) -> Self {
        Self {
            room_id,
            author_id,
            body,
            kind,
        }
    }
}
