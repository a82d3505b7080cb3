//! # campus-core
//!
//! Domain layer containing entities, value objects and repository traits
//! for activity chat rooms.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChatMessage, ChatUser, Chatroom, NewChatMessage, MAX_BODY_CHARS, REDACTION_MARKER,
    UNKNOWN_USER_NAME,
};
pub use error::DomainError;
pub use traits::{ChatroomRepository, MessageRepository, RepoResult, UserRepository};
pub use value_objects::{IdParseError, MessageId, MessageKind, PostId, RoomId, UserId};
