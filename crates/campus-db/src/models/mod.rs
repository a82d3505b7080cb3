//! Database models - SQLx-compatible structs for PostgreSQL tables

mod chatroom;
mod message;
mod user;

pub use chatroom::ChatroomModel;
pub use message::MessageModel;
pub use user::UserModel;
