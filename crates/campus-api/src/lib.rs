//! # campus-api
//!
//! HTTP server for the activity chat built with Axum: room history,
//! attachment uploads, message deletion and the lobby WebSocket, all
//! sharing one room hub.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_basic_app, run, serve};
pub use state::AppState;
