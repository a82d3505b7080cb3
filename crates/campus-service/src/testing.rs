//! In-memory repositories for tests
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for downstream crates that need a [`ServiceContext`] without PostgreSQL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use campus_common::{ChatConfig, JwtService, StorageConfig};
use campus_core::entities::{ChatMessage, ChatUser, Chatroom, NewChatMessage};
use campus_core::traits::{ChatroomRepository, MessageRepository, RepoResult, UserRepository};
use campus_core::{DomainError, MessageId, MessageKind, PostId, RoomId, UserId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::services::{ServiceContext, ServiceContextBuilder};

/// Secret used to sign tokens in tests
pub const TEST_JWT_SECRET: &str = "campus-test-secret";

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, ChatUser>,
    rooms: HashMap<RoomId, Chatroom>,
    messages: HashMap<MessageId, ChatMessage>,
}

#[derive(Default)]
struct Inner {
    tables: RwLock<Tables>,
    next_message_id: AtomicI64,
    fail_writes: AtomicBool,
}

/// Shared backing store for the in-memory repositories
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every message write fail as if the database were down
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn add_user(&self, id: UserId, sut_id: &str, first_name: &str, last_name: &str) {
        let user = ChatUser {
            id,
            sut_id: sut_id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            avatar_url: Some(format!("upload/avatars/{}.png", first_name.to_lowercase())),
        };
        self.inner.tables.write().users.insert(id, user);
    }

    pub fn add_room(&self, id: RoomId, post_id: PostId) {
        let room = Chatroom {
            id,
            post_id,
            created_at: Utc::now(),
        };
        self.inner.tables.write().rooms.insert(id, room);
    }

    /// Seed a message with an explicit creation time
    pub fn add_message(
        &self,
        room_id: RoomId,
        author_id: UserId,
        body: &str,
        kind: MessageKind,
        created_at: DateTime<Utc>,
    ) -> MessageId {
        let message = ChatMessage {
            id: self.next_id(),
            room_id,
            author_id,
            body: body.to_string(),
            kind,
            created_at,
            updated_at: created_at,
        };
        let id = message.id;
        self.inner.tables.write().messages.insert(id, message);
        id
    }

    /// Stored message by id
    pub fn message(&self, id: MessageId) -> Option<ChatMessage> {
        self.inner.tables.read().messages.get(&id).cloned()
    }

    /// Every stored message, in id order
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut all: Vec<ChatMessage> =
            self.inner.tables.read().messages.values().cloned().collect();
        all.sort_by_key(|m| m.id);
        all
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        Arc::new(InMemoryUserRepository(self.clone()))
    }

    pub fn chatroom_repo(&self) -> Arc<dyn ChatroomRepository> {
        Arc::new(InMemoryChatroomRepository(self.clone()))
    }

    pub fn message_repo(&self) -> Arc<dyn MessageRepository> {
        Arc::new(InMemoryMessageRepository(self.clone()))
    }

    fn next_id(&self) -> MessageId {
        MessageId::new(self.inner.next_message_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn check_writable(&self) -> RepoResult<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Context backed by `store` with default chat and storage settings
pub fn test_context(store: &InMemoryStore) -> ServiceContext {
    test_context_with(store, ChatConfig::default(), StorageConfig::default())
}

pub fn test_context_with_storage(store: &InMemoryStore, storage: StorageConfig) -> ServiceContext {
    test_context_with(store, ChatConfig::default(), storage)
}

pub fn test_context_with(
    store: &InMemoryStore,
    chat: ChatConfig,
    storage: StorageConfig,
) -> ServiceContext {
    let jwt = Arc::new(JwtService::new(TEST_JWT_SECRET, 3600));
    match ServiceContextBuilder::new()
        .user_repo(store.user_repo())
        .chatroom_repo(store.chatroom_repo())
        .message_repo(store.message_repo())
        .jwt_service(jwt)
        .chat_config(chat)
        .storage_config(storage)
        .build()
    {
        Ok(ctx) => ctx,
        Err(e) => panic!("test context is fully specified: {e}"),
    }
}

struct InMemoryUserRepository(InMemoryStore);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<ChatUser>> {
        Ok(self.0.inner.tables.read().users.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> RepoResult<Vec<ChatUser>> {
        let tables = self.0.inner.tables.read();
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }
}

struct InMemoryChatroomRepository(InMemoryStore);

#[async_trait]
impl ChatroomRepository for InMemoryChatroomRepository {
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Option<Chatroom>> {
        Ok(self
            .0
            .inner
            .tables
            .read()
            .rooms
            .values()
            .find(|r| r.post_id == post_id)
            .cloned())
    }

    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Chatroom>> {
        Ok(self.0.inner.tables.read().rooms.get(&id).cloned())
    }
}

struct InMemoryMessageRepository(InMemoryStore);

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<ChatMessage>> {
        Ok(self.0.message(id))
    }

    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = self
            .0
            .inner
            .tables
            .read()
            .messages
            .values()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn create(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        self.0.check_writable()?;
        let now = Utc::now();
        let stored = ChatMessage {
            id: self.0.next_id(),
            room_id: message.room_id,
            author_id: message.author_id,
            body: message.body,
            kind: message.kind,
            created_at: now,
            updated_at: now,
        };
        self.0
            .inner
            .tables
            .write()
            .messages
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_body(&self, id: MessageId, body: &str) -> RepoResult<ChatMessage> {
        self.0.check_writable()?;
        let mut tables = self.0.inner.tables.write();
        let message = tables
            .messages
            .get_mut(&id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.body = body.to_string();
        message.updated_at = Utc::now();
        Ok(message.clone())
    }
}
