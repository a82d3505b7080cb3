//! Chatroom entity - the chat attached to an activity post

use chrono::{DateTime, Utc};

use crate::value_objects::{PostId, RoomId};

/// Chat room belonging to one activity post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chatroom {
    pub id: RoomId,
    pub post_id: PostId,
    pub created_at: DateTime<Utc>,
}
