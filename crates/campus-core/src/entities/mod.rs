//! Domain entities - core business objects

mod chatroom;
mod message;
mod user;

pub use chatroom::Chatroom;
pub use message::{ChatMessage, NewChatMessage, MAX_BODY_CHARS, REDACTION_MARKER};
pub use user::{ChatUser, UNKNOWN_USER_NAME};
