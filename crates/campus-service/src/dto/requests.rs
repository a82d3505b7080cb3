//! Request DTOs
//!
//! Request DTOs implement `Deserialize` and `Validate` for input validation.

use campus_core::MessageKind;
use serde::Deserialize;
use validator::Validate;

/// New chat content from a connected client
///
/// Only the body and kind are taken from the client; the sender is always
/// the authenticated session.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PostMessageRequest {
    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub body: String,

    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

impl PostMessageRequest {
    pub fn new(body: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            body: body.into(),
            kind,
        }
    }

    /// Text message shorthand
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(body, MessageKind::Text)
    }

    /// Copy of the request with surrounding whitespace removed from the body
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(self.body.trim(), self.kind)
    }
}
