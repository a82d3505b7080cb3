//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for inbound chat content
//! - Response DTOs, including the WebSocket wire envelope
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::PostMessageRequest;

pub use responses::{
    ChatEnvelope, DeleteMessageResponse, DeletedMessage, EnvelopeKind, HealthResponse,
    HistoryMessage, ReadinessChecks, ReadinessResponse, UploadResponse, DELETE_SUCCESS_MESSAGE,
};

pub use mappers::{format_timestamp, MessageWithAuthor};
