//! User entity <-> model mapper

use campus_core::entities::ChatUser;
use campus_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for ChatUser {
    fn from(model: UserModel) -> Self {
        ChatUser {
            id: UserId::new(model.id),
            sut_id: model.sut_id,
            first_name: model.first_name,
            last_name: model.last_name,
            avatar_url: model.avatar_url.filter(|url| !url.is_empty()),
        }
    }
}
