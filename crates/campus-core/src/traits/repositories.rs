//! Repository traits (ports) - define the interface for data access
//!
//! The chat owns its messages and rooms; users are owned by the wider
//! platform and are only looked up here.

use async_trait::async_trait;

use crate::entities::{ChatMessage, ChatUser, Chatroom, NewChatMessage};
use crate::error::DomainError;
use crate::value_objects::{MessageId, PostId, RoomId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<ChatUser>>;

    /// Find several users at once; missing ids are skipped
    async fn find_many(&self, ids: &[UserId]) -> RepoResult<Vec<ChatUser>>;
}

// ============================================================================
// Chatroom Repository
// ============================================================================

#[async_trait]
pub trait ChatroomRepository: Send + Sync {
    /// Find the chat room attached to an activity post
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Option<Chatroom>>;

    /// Find chat room by ID
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Chatroom>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<ChatMessage>>;

    /// All messages of a room, oldest first (ties broken by id)
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<ChatMessage>>;

    /// Store a new message and return it with its assigned id and timestamps
    async fn create(&self, message: NewChatMessage) -> RepoResult<ChatMessage>;

    /// Overwrite the body of an existing message
    async fn update_body(&self, id: MessageId, body: &str) -> RepoResult<ChatMessage>;
}
