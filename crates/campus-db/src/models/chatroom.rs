//! Chatroom database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chatrooms table
#[derive(Debug, Clone, FromRow)]
pub struct ChatroomModel {
    pub id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}
