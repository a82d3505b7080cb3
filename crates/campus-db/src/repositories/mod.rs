//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in campus-core.

mod chatroom;
mod error;
mod message;
mod user;

pub use chatroom::PgChatroomRepository;
pub use message::PgMessageRepository;
pub use user::PgUserRepository;
