//! Message recording seam
//!
//! The session hands inbound content to a recorder and broadcasts whatever
//! the recorder returns, so nothing reaches a room before it is stored.

use std::sync::Arc;

use async_trait::async_trait;
use campus_common::Identity;
use campus_core::RoomId;
use campus_service::{ChatEnvelope, ChatService, PostMessageRequest, ServiceContext, ServiceResult};

/// Persists inbound chat content
#[async_trait]
pub trait MessageRecorder: Send + Sync {
    /// Store a message and return the envelope to broadcast
    async fn record(
        &self,
        room_id: RoomId,
        sender: &Identity,
        request: PostMessageRequest,
    ) -> ServiceResult<ChatEnvelope>;
}

/// Recorder backed by [`ChatService`]
#[derive(Clone, Debug)]
pub struct ServiceRecorder {
    ctx: Arc<ServiceContext>,
}

impl ServiceRecorder {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl MessageRecorder for ServiceRecorder {
    async fn record(
        &self,
        room_id: RoomId,
        sender: &Identity,
        request: PostMessageRequest,
    ) -> ServiceResult<ChatEnvelope> {
        ChatService::new(&self.ctx)
            .post_message(room_id, sender, request)
            .await
    }
}
