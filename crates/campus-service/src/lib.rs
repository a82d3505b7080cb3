//! # campus-service
//!
//! Application layer for the chat hub: message history, posting, deletion
//! and attachment storage, plus the DTOs that cross the HTTP and WebSocket
//! boundaries.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dto::{
    ChatEnvelope, DeleteMessageResponse, DeletedMessage, EnvelopeKind, HealthResponse,
    HistoryMessage, PostMessageRequest, ReadinessChecks, ReadinessResponse, UploadResponse,
};
pub use services::{
    ChatService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UploadKind,
    UploadService,
};
