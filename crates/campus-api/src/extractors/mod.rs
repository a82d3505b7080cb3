//! Axum extractors for request handling
//!
//! Custom extractors for authentication and typed path parameters.

mod auth;
mod path;

pub use auth::AuthUser;
pub use path::{MessageIdPath, PostIdPath};
