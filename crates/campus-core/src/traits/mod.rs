//! Repository traits

mod repositories;

pub use repositories::{ChatroomRepository, MessageRepository, RepoResult, UserRepository};
