//! Chat service
//!
//! Resolves rooms, stores new messages, renders history and handles
//! author deletes. Broadcasting is left to the caller: every method that
//! produces an envelope returns it only after the store has accepted the
//! change.

use campus_common::Identity;
use campus_core::entities::{Chatroom, NewChatMessage};
use campus_core::{DomainError, MessageId, PostId, RoomId, UserId, REDACTION_MARKER};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{
    ChatEnvelope, DeletedMessage, HistoryMessage, MessageWithAuthor, PostMessageRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Find the chat room of an activity post
    #[instrument(skip(self))]
    pub async fn resolve_room(&self, post_id: PostId) -> ServiceResult<Chatroom> {
        let room = self
            .ctx
            .chatroom_repo()
            .find_by_post(post_id)
            .await?
            .ok_or(DomainError::ChatroomNotFound(post_id))?;
        Ok(room)
    }

    /// Full history of a post's room, oldest first
    #[instrument(skip(self))]
    pub async fn history(&self, post_id: PostId) -> ServiceResult<Vec<HistoryMessage>> {
        let room = self.resolve_room(post_id).await?;
        let messages = self.ctx.message_repo().find_by_room(room.id).await?;

        let mut author_ids: Vec<UserId> = messages.iter().map(|m| m.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let authors = self.ctx.user_repo().find_many(&author_ids).await?;

        debug!(room_id = %room.id, count = messages.len(), "Loaded history");

        Ok(messages
            .into_iter()
            .map(|m| MessageWithAuthor::from_lookup(m, &authors).into())
            .collect())
    }

    /// Store a message sent by `sender` into `room_id` and render it
    ///
    /// The returned envelope carries the id and timestamp assigned by the
    /// store.
    #[instrument(skip(self, sender, request), fields(user_id = %sender.user_id))]
    pub async fn post_message(
        &self,
        room_id: RoomId,
        sender: &Identity,
        request: PostMessageRequest,
    ) -> ServiceResult<ChatEnvelope> {
        let request = request.trimmed();
        if request.body.is_empty() {
            return Err(DomainError::EmptyBody.into());
        }
        request.validate()?;

        let message = self
            .ctx
            .message_repo()
            .create(NewChatMessage::new(
                room_id,
                sender.user_id,
                request.body,
                request.kind,
            ))
            .await?;

        let author = self.ctx.user_repo().find_by_id(sender.user_id).await?;
        if author.is_none() {
            warn!(user_id = %sender.user_id, "Sender has no user record");
        }

        debug!(message_id = %message.id, room_id = %room_id, "Message stored");

        let mut envelope = ChatEnvelope::from(MessageWithAuthor::new(message, author));
        if envelope.sut_id.is_empty() {
            envelope.sut_id.clone_from(&sender.sut_id);
        }
        Ok(envelope)
    }

    /// Redact a message on behalf of its author
    ///
    /// Only the author may delete, and only while the message is younger
    /// than the configured window. Rejections leave the message untouched.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: MessageId,
        requester: UserId,
    ) -> ServiceResult<DeletedMessage> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        if !message.is_authored_by(requester) {
            return Err(DomainError::NotMessageAuthor.into());
        }

        let window = self.ctx.chat_config().delete_window();
        if !message.within_delete_window(Utc::now(), window) {
            return Err(DomainError::DeleteWindowExpired {
                minutes: window.num_minutes(),
            }
            .into());
        }
        if message.is_redacted() {
            debug!(message_id = %message_id, "Message already deleted; broadcasting again");
        }

        let updated = self
            .ctx
            .message_repo()
            .update_body(message_id, REDACTION_MARKER)
            .await?;
        let author = self.ctx.user_repo().find_by_id(updated.author_id).await?;

        info!(message_id = %message_id, room_id = %updated.room_id, "Message deleted");

        Ok(DeletedMessage {
            room_id: updated.room_id,
            envelope: MessageWithAuthor::new(updated, author).into_delete_envelope(),
        })
    }
}
