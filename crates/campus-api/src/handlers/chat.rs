//! Chat handlers
//!
//! History, attachment uploads and message deletion. Live messages arrive
//! over the lobby socket; deletion is the one HTTP operation that fans out
//! to a room.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use campus_gateway::BroadcastEvent;
use campus_service::{
    ChatService, DeleteMessageResponse, HistoryMessage, UploadKind, UploadResponse, UploadService,
};

use crate::extractors::{AuthUser, MessageIdPath, PostIdPath};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Get the full history of a post's chat room
///
/// GET /chat/history/{post_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<Vec<HistoryMessage>>> {
    let post_id = path.post_id()?;
    let messages = ChatService::new(state.service_context())
        .history(post_id)
        .await?;
    Ok(Json(messages))
}

/// Upload an image attachment
///
/// POST /chat/upload
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Created<Json<UploadResponse>>> {
    store_upload(&state, &auth, UploadKind::Image, multipart).await
}

/// Upload a generic file attachment
///
/// POST /chat/upload/file
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Created<Json<UploadResponse>>> {
    store_upload(&state, &auth, UploadKind::File, multipart).await
}

async fn store_upload(
    state: &AppState,
    auth: &AuthUser,
    kind: UploadKind,
    mut multipart: Multipart,
) -> ApiResult<Created<Json<UploadResponse>>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(kind.field_name()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field.bytes().await?;

        tracing::debug!(
            user_id = %auth.identity().user_id,
            field = kind.field_name(),
            size = bytes.len(),
            "Receiving upload"
        );

        let response = UploadService::new(state.service_context())
            .store(kind, &file_name, content_type.as_deref(), &bytes)
            .await?;
        return Ok(Created(Json(response)));
    }

    Err(ApiError::MissingField(kind.field_name()))
}

/// Delete one's own message and tell its room
///
/// DELETE /chat/message/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<MessageIdPath>,
) -> ApiResult<Json<DeleteMessageResponse>> {
    let message_id = path.message_id()?;

    let deleted = ChatService::new(state.service_context())
        .delete_message(message_id, auth.identity().user_id)
        .await?;

    // The record is already redacted; only then does the room hear about it
    state
        .hub()
        .broadcast(BroadcastEvent::new(deleted.room_id, deleted.envelope))
        .await;

    Ok(Json(DeleteMessageResponse::new(message_id)))
}
