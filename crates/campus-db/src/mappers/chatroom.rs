//! Chatroom entity <-> model mapper

use campus_core::entities::Chatroom;
use campus_core::value_objects::{PostId, RoomId};

use crate::models::ChatroomModel;

impl From<ChatroomModel> for Chatroom {
    fn from(model: ChatroomModel) -> Self {
        Chatroom {
            id: RoomId::new(model.id),
            post_id: PostId::new(model.post_id),
            created_at: model.created_at,
        }
    }
}
