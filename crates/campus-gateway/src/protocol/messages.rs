//! Frame encoding and decoding

use std::borrow::Cow;

use axum::extract::ws::{CloseFrame, Message};
use campus_core::MessageKind;
use campus_service::{ChatEnvelope, PostMessageRequest};
use serde::Deserialize;

use super::CloseCode;

/// Message sent by a client into its room
///
/// Any other keys (id, sender name, ...) are ignored; the sender is always
/// the authenticated connection.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub body: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl InboundMessage {
    /// Parse a text frame
    ///
    /// # Errors
    /// Returns the JSON error for anything that is not an object with a
    /// string `body`
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Content kind; unknown or missing tags are text
    pub fn kind(&self) -> MessageKind {
        self.kind
            .as_deref()
            .map(MessageKind::from_tag)
            .unwrap_or_default()
    }

    pub fn into_request(self) -> PostMessageRequest {
        let kind = self.kind();
        PostMessageRequest::new(self.body, kind)
    }
}

/// Serialize an envelope into a text frame
///
/// # Errors
/// Returns the JSON error if serialization fails
pub fn encode_envelope(envelope: &ChatEnvelope) -> Result<Message, serde_json::Error> {
    serde_json::to_string(envelope).map(|json| Message::Text(json.into()))
}

/// Close frame carrying an application close code
pub fn close_frame(code: CloseCode) -> Message {
    Message::Close(Some(CloseFrame {
        code: code.as_u16(),
        reason: Cow::Borrowed(code.description()),
    }))
}
