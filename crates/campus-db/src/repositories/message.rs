//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::entities::{ChatMessage, NewChatMessage};
use campus_core::traits::{MessageRepository, RepoResult};
use campus_core::value_objects::{MessageId, RoomId};

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<ChatMessage>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, chat_room_id, user_id, body, messages_type_id, created_at, updated_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ChatMessage::from))
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<ChatMessage>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, chat_room_id, user_id, body, messages_type_id, created_at, updated_at
            FROM messages
            WHERE chat_room_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(room_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ChatMessage::from).collect())
    }

    #[instrument(skip(self, message), fields(room_id = %message.room_id, kind = %message.kind))]
    async fn create(&self, message: NewChatMessage) -> RepoResult<ChatMessage> {
        let insert = MessageInsert::new(&message);

        let created = sqlx::query_as::<_, MessageModel>(
            r#"
            INSERT INTO messages (chat_room_id, user_id, body, messages_type_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chat_room_id, user_id, body, messages_type_id, created_at, updated_at
            "#,
        )
        .bind(insert.chat_room_id)
        .bind(insert.user_id)
        .bind(insert.body)
        .bind(insert.messages_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ChatMessage::from(created))
    }

    #[instrument(skip(self, body))]
    async fn update_body(&self, id: MessageId, body: &str) -> RepoResult<ChatMessage> {
        let updated = sqlx::query_as::<_, MessageModel>(
            r#"
            UPDATE messages
            SET body = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, chat_room_id, user_id, body, messages_type_id, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(body)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        updated
            .map(ChatMessage::from)
            .ok_or_else(|| message_not_found(id))
    }
}
