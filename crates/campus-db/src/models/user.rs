//! User database model (read-only columns used by the chat)

use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub sut_id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}
