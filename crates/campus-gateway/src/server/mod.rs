//! Lobby route
//!
//! The gateway does not run its own listener; the API server mounts
//! [`lobby_routes`] so REST handlers and WebSocket sessions share one hub.

mod handler;
mod origin;
mod state;

pub use handler::{lobby_handler, TokenQuery};
pub use origin::OriginPolicy;
pub use state::GatewayState;

use axum::{extract::FromRef, routing::get, Router};

/// Lobby routes, generic over any router state that contains a
/// [`GatewayState`]
pub fn lobby_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    GatewayState: FromRef<S>,
{
    Router::new().route("/chat/ws/lobby/:post_id", get(lobby_handler))
}
