//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and orchestrate repository calls,
//! validation and storage for a single use case.

pub mod chat;
pub mod context;
pub mod error;
pub mod upload;

pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use upload::{UploadKind, UploadService};
