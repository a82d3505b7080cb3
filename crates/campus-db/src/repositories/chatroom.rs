//! PostgreSQL implementation of ChatroomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use campus_core::entities::Chatroom;
use campus_core::traits::{ChatroomRepository, RepoResult};
use campus_core::value_objects::{PostId, RoomId};

use crate::models::ChatroomModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ChatroomRepository
#[derive(Clone)]
pub struct PgChatroomRepository {
    pool: PgPool,
}

impl PgChatroomRepository {
    /// Create a new PgChatroomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatroomRepository for PgChatroomRepository {
    #[instrument(skip(self))]
    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Option<Chatroom>> {
        let result = sqlx::query_as::<_, ChatroomModel>(
            r"
            SELECT id, post_id, created_at
            FROM chatrooms
            WHERE post_id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chatroom::from))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Chatroom>> {
        let result = sqlx::query_as::<_, ChatroomModel>(
            r"
            SELECT id, post_id, created_at
            FROM chatrooms
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Chatroom::from))
    }
}
