//! Path parameter extractors
//!
//! Numeric ids arrive as strings so a malformed id becomes a 400 with our
//! error body instead of axum's plain-text rejection.

use campus_core::{MessageId, PostId};
use serde::Deserialize;

use crate::response::ApiError;

/// Path parameters with post_id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub post_id: String,
}

impl PostIdPath {
    /// Parse post_id
    pub fn post_id(&self) -> Result<PostId, ApiError> {
        PostId::parse(&self.post_id)
            .map_err(|_| ApiError::invalid_path("Invalid post_id format"))
    }
}

/// Path parameters with message_id
#[derive(Debug, Deserialize)]
pub struct MessageIdPath {
    pub message_id: String,
}

impl MessageIdPath {
    /// Parse message_id
    pub fn message_id(&self) -> Result<MessageId, ApiError> {
        MessageId::parse(&self.message_id)
            .map_err(|_| ApiError::invalid_path("Invalid message_id format"))
    }
}
