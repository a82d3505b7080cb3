//! Lobby WebSocket handler
//!
//! Authenticates and resolves the room before upgrading, so rejected
//! requests never allocate a connection.

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use campus_common::AppError;
use campus_core::PostId;
use campus_service::ChatService;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::connection::{Connection, ConnectionSession};
use crate::handlers::{HandlerError, HandlerResult};
use crate::server::GatewayState;

/// Browsers cannot set headers on a WebSocket handshake, so the token may
/// also come as `?token=`
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Pick the bearer token, preferring the header
pub(crate) fn select_token(
    header: Option<&Authorization<Bearer>>,
    query: &TokenQuery,
) -> Result<String, AppError> {
    header
        .map(|auth| auth.token().to_string())
        .or_else(|| query.token.clone())
        .filter(|token| !token.trim().is_empty())
        .ok_or(AppError::MissingAuth)
}

/// `GET /chat/ws/lobby/:post_id`
pub async fn lobby_handler(
    State(state): State<GatewayState>,
    Path(post_id): Path<i64>,
    Query(query): Query<TokenQuery>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> HandlerResult<Response> {
    let origin = headers.get(header::ORIGIN).map(|value| value.to_str().unwrap_or_default());
    if !state.origin_policy().allows(origin) {
        let origin = origin.unwrap_or_default().to_string();
        tracing::warn!(origin = %origin, "Lobby handshake from disallowed origin");
        return Err(HandlerError::OriginNotAllowed(origin));
    }

    let token = select_token(bearer.as_ref().map(|TypedHeader(auth)| auth), &query)?;
    let identity = state.jwt_service().authenticate(&token).map_err(|e| {
        tracing::debug!(error = %e, "Lobby authentication failed");
        HandlerError::AuthenticationFailed(e)
    })?;

    let post_id = PostId::new(post_id);
    let room = ChatService::new(state.service_context())
        .resolve_room(post_id)
        .await
        .map_err(HandlerError::from_service)?;

    let connection = Connection::new(room.id, identity);
    let session = ConnectionSession::new(
        connection,
        state.hub().clone(),
        state.recorder(),
        state.chat_config(),
    );

    tracing::debug!(post_id = %post_id, room_id = %room.id, "Upgrading lobby connection");

    Ok(ws
        .on_upgrade(move |socket| async move {
            let (sink, stream) = socket.split();
            session.run(sink, stream).await;
        })
        .into_response())
}
