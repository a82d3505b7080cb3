//! Value objects - immutable types that represent domain concepts

mod ids;
mod message_kind;

pub use ids::{IdParseError, MessageId, PostId, RoomId, UserId};
pub use message_kind::MessageKind;
