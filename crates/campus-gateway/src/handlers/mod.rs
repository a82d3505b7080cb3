//! Lobby request and frame handling errors

mod error;

pub use error::{HandlerError, HandlerResult};
