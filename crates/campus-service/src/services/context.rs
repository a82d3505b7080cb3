//! Service context - dependency container for services
//!
//! Holds the repositories, the JWT service and the chat/storage settings
//! needed by services.

use std::sync::Arc;

use campus_common::{ChatConfig, JwtService, StorageConfig};
use campus_core::traits::{ChatroomRepository, MessageRepository, UserRepository};
use campus_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cloned into every request handler and every connection session, so all
/// members are cheap to clone. The pool is absent when the context is backed
/// by in-memory repositories.
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool (readiness checks only)
    pool: Option<PgPool>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    chatroom_repo: Arc<dyn ChatroomRepository>,
    message_repo: Arc<dyn MessageRepository>,

    // Services
    jwt_service: Arc<JwtService>,

    // Settings
    chat: ChatConfig,
    storage: StorageConfig,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if one is configured
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the chatroom repository
    pub fn chatroom_repo(&self) -> &dyn ChatroomRepository {
        self.chatroom_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    // === Settings ===

    pub fn chat_config(&self) -> &ChatConfig {
        &self.chat
    }

    pub fn storage_config(&self) -> &StorageConfig {
        &self.storage
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("chat", &self.chat)
            .field("storage", &self.storage)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    chatroom_repo: Option<Arc<dyn ChatroomRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    chat: Option<ChatConfig>,
    storage: Option<StorageConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn chatroom_repo(mut self, repo: Arc<dyn ChatroomRepository>) -> Self {
        self.chatroom_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn chat_config(mut self, config: ChatConfig) -> Self {
        self.chat = Some(config);
        self
    }

    pub fn storage_config(mut self, config: StorageConfig) -> Self {
        self.storage = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            pool: self.pool,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            chatroom_repo: self
                .chatroom_repo
                .ok_or_else(|| ServiceError::validation("chatroom_repo is required"))?,
            message_repo: self
                .message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            chat: self.chat.unwrap_or_default(),
            storage: self.storage.unwrap_or_default(),
        })
    }
}
