//! Message entity <-> model mapper

use campus_core::entities::{ChatMessage, NewChatMessage};
use campus_core::value_objects::{MessageId, MessageKind, RoomId, UserId};

use crate::models::MessageModel;

/// Convert MessageModel to ChatMessage entity
///
/// Type ids this build does not know about are read as text.
impl From<MessageModel> for ChatMessage {
    fn from(model: MessageModel) -> Self {
        ChatMessage {
            id: MessageId::new(model.id),
            room_id: RoomId::new(model.chat_room_id),
            author_id: UserId::new(model.user_id),
            body: model.body,
            kind: MessageKind::from_code(model.messages_type_id).unwrap_or_default(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Column values for inserting a new message
pub struct MessageInsert<'a> {
    pub chat_room_id: i64,
    pub user_id: i64,
    pub body: &'a str,
    pub messages_type_id: i32,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a NewChatMessage) -> Self {
        Self {
            chat_room_id: message.room_id.into_inner(),
            user_id: message.author_id.into_inner(),
            body: &message.body,
            messages_type_id: message.kind.code(),
        }
    }
}
