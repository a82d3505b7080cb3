//! Chat integration tests
//!
//! Each test runs the full router with in-memory repositories on an
//! ephemeral port; no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test chat_tests

use campus_core::{MessageId, RoomId};
use campus_service::{EnvelopeKind, HistoryMessage};
use chrono::Duration;
use integration_tests::{
    assert_json, assert_status, fixtures::*, LobbyFrame, TestServer,
};
use reqwest::StatusCode;
use serde_json::Value;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_without_database() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "not_configured");
    assert_eq!(body["checks"]["hub"], "running");
}

// ============================================================================
// Lobby Tests
// ============================================================================

#[tokio::test]
async fn test_message_reaches_room_and_history() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    let mut grace = server.join(POST_ID, ROOM_ID, GRACE).await.unwrap();

    ada.send(&OutgoingMessage::text("hi")).await.unwrap();

    for client in [&mut ada, &mut grace] {
        let event = client.next_event().await.unwrap();
        assert!(event.id.into_inner() > 0);
        assert_eq!(event.body, "hi");
        assert_eq!(event.kind, EnvelopeKind::Text);
        assert_eq!(event.chat_room_id, RoomId::new(ROOM_ID));
        assert_eq!(event.user_id, ADA.user_id());
        assert_eq!(event.user_name, ADA.full_name());
        assert_eq!(event.user_avatar, ADA.avatar());
        assert_eq!(event.sut_id, ADA.sut_id);
    }

    grace.send(&OutgoingMessage::text("hello back")).await.unwrap();
    assert_eq!(ada.next_event().await.unwrap().body, "hello back");
    assert_eq!(grace.next_event().await.unwrap().body, "hello back");

    let response = server.get(&format!("/api/chat/history/{POST_ID}")).await.unwrap();
    let history: Vec<HistoryMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["hi", "hello back"]);
    assert_eq!(history[0].kind, 1);
    assert_eq!(history[0].user_name, ADA.full_name());
    assert_eq!(history[1].user_name, GRACE.full_name());
}

#[tokio::test]
async fn test_history_wire_format() {
    let server = TestServer::start().await.expect("Failed to start server");
    seed_message(&server.store, ADA, "old news", Duration::minutes(30));

    let response = server.get(&format!("/api/chat/history/{POST_ID}")).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let item = &body[0];

    assert!(item["ID"].is_i64());
    assert_eq!(item["body"], "old news");
    assert_eq!(item["type"], 1);
    assert_eq!(item["chat_room_id"], ROOM_ID);
    assert_eq!(item["sut_id"], ADA.sut_id);
    assert!(item["created_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_image_message_keeps_type() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();

    ada.send(&OutgoingMessage::image("upload/chat/photo/x_cat.png"))
        .await
        .unwrap();
    let event = ada.next_event().await.unwrap();
    assert_eq!(event.kind, EnvelopeKind::Image);
    assert_eq!(event.body, "upload/chat/photo/x_cat.png");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    let mut grace = server.join(OTHER_POST_ID, OTHER_ROOM_ID, GRACE).await.unwrap();

    ada.send(&OutgoingMessage::text("room seven only")).await.unwrap();
    assert_eq!(ada.next_event().await.unwrap().body, "room seven only");

    // Grace's first frame is her own message, not Ada's
    grace.send(&OutgoingMessage::text("room nine")).await.unwrap();
    let event = grace.next_event().await.unwrap();
    assert_eq!(event.body, "room nine");
    assert_eq!(event.chat_room_id, RoomId::new(OTHER_ROOM_ID));
}

#[tokio::test]
async fn test_sender_not_blocked_by_idle_member() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    // Joins but never reads
    let _grace = server.join(POST_ID, ROOM_ID, GRACE).await.unwrap();

    for i in 0..300 {
        ada.send(&OutgoingMessage::text(format!("m{i}"))).await.unwrap();
    }
    for i in 0..300 {
        assert_eq!(ada.next_event().await.unwrap().body, format!("m{i}"));
    }
    assert_eq!(server.store.messages().len(), 300);
}

#[tokio::test]
async fn test_storage_failure_keeps_connection() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();

    server.store.fail_writes(true);
    ada.send(&OutgoingMessage::text("lost")).await.unwrap();

    // Give the reader time to attempt the write before storage recovers
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    server.store.fail_writes(false);
    ada.send(&OutgoingMessage::text("kept")).await.unwrap();

    assert_eq!(ada.next_event().await.unwrap().body, "kept");
    assert_eq!(server.store.messages().len(), 1);
}

#[tokio::test]
async fn test_invalid_frame_closes_with_decode_error() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();

    ada.send_raw("not json").await.unwrap();
    assert_eq!(ada.next_close().await.unwrap(), Some(4002));

    integration_tests::wait_for(|| {
        let hub = server.hub.clone();
        async move { hub.member_count(RoomId::new(ROOM_ID)).await.unwrap_or(1) == 0 }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_closing_client_leaves_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    let _grace = server.join(POST_ID, ROOM_ID, GRACE).await.unwrap();
    assert_eq!(server.hub.member_count(RoomId::new(ROOM_ID)).await.unwrap(), 2);

    ada.close().await.unwrap();

    integration_tests::wait_for(|| {
        let hub = server.hub.clone();
        async move { hub.member_count(RoomId::new(ROOM_ID)).await.unwrap_or(0) == 1 }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_handshake_rejections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(ADA).unwrap();

    assert_eq!(
        server.handshake_status(MISSING_POST_ID, Some(&token)).await.unwrap(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.handshake_status(POST_ID, None).await.unwrap(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        server.handshake_status(POST_ID, Some("garbage")).await.unwrap(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(server.hub.room_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_handshake_checks_origin() {
    let server = TestServer::start_with_origins(&["https://sa.sut.ac.th"])
        .await
        .expect("Failed to start server");
    let token = server.token_for(ADA).unwrap();

    assert_eq!(
        server
            .handshake_status_from(POST_ID, Some(&token), Some("https://evil.example"))
            .await
            .unwrap(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(server.hub.room_count().await.unwrap(), 0);

    assert_eq!(
        server
            .handshake_status_from(POST_ID, Some(&token), Some("https://sa.sut.ac.th"))
            .await
            .unwrap(),
        StatusCode::SWITCHING_PROTOCOLS
    );
    // Non-browser clients send no origin
    assert_eq!(
        server.handshake_status(POST_ID, Some(&token)).await.unwrap(),
        StatusCode::SWITCHING_PROTOCOLS
    );
}

// ============================================================================
// History Tests
// ============================================================================

#[tokio::test]
async fn test_history_unknown_post() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .get(&format!("/api/chat/history/{MISSING_POST_ID}"))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body["error"]["code"], "UNKNOWN_CHATROOM");
}

#[tokio::test]
async fn test_history_sorted_by_creation() {
    let server = TestServer::start().await.expect("Failed to start server");
    seed_message(&server.store, GRACE, "second", Duration::minutes(5));
    seed_message(&server.store, ADA, "first", Duration::minutes(10));
    seed_message(&server.store, ADA, "third", Duration::minutes(1));

    let response = server.get(&format!("/api/chat/history/{POST_ID}")).await.unwrap();
    let history: Vec<HistoryMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_broadcasts_to_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let id = seed_message(&server.store, ADA, "oops", Duration::minutes(1));
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    let mut grace = server.join(POST_ID, ROOM_ID, GRACE).await.unwrap();
    let token = server.token_for(ADA).unwrap();

    let response = server
        .delete_auth(&format!("/api/chat/message/{id}"), &token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["message"], "Message deleted successfully");
    assert_eq!(body["id"], id.into_inner());

    for client in [&mut ada, &mut grace] {
        let event = client.next_event().await.unwrap();
        assert_eq!(event.kind, EnvelopeKind::Delete);
        assert_eq!(event.id, id);
        assert_eq!(event.body, "[DELETED]");
        assert_eq!(event.chat_room_id, RoomId::new(ROOM_ID));
    }

    assert_eq!(server.store.message(id).unwrap().body, "[DELETED]");
}

#[tokio::test]
async fn test_delete_after_window_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let id = seed_message(&server.store, ADA, "too late", Duration::minutes(20));
    let mut ada = server.join(POST_ID, ROOM_ID, ADA).await.unwrap();
    let token = server.token_for(ADA).unwrap();

    let response = server
        .delete_auth(&format!("/api/chat/message/{id}"), &token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["error"]["code"], "DELETE_WINDOW_EXPIRED");
    assert_eq!(
        body["error"]["message"],
        "Cannot delete messages older than 15 minutes"
    );

    // No delete event: the next frame Ada sees is her own message
    ada.send(&OutgoingMessage::text("still here")).await.unwrap();
    match ada.next_frame().await.unwrap() {
        LobbyFrame::Event(event) => {
            assert_eq!(event.kind, EnvelopeKind::Text);
            assert_eq!(event.body, "still here");
        }
        LobbyFrame::Closed(code) => panic!("unexpected close {code:?}"),
    }

    let response = server.get(&format!("/api/chat/history/{POST_ID}")).await.unwrap();
    let history: Vec<HistoryMessage> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(history[0].id, id);
    assert_eq!(history[0].body, "too late");
}

#[tokio::test]
async fn test_delete_someone_elses_message() {
    let server = TestServer::start().await.expect("Failed to start server");
    let id = seed_message(&server.store, ADA, "mine", Duration::minutes(1));
    let token = server.token_for(GRACE).unwrap();

    let response = server
        .delete_auth(&format!("/api/chat/message/{id}"), &token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_MESSAGE_AUTHOR");
    assert_eq!(server.store.message(id).unwrap().body, "mine");
}

#[tokio::test]
async fn test_delete_bad_requests() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(ADA).unwrap();

    let response = server.delete_auth("/api/chat/message/abc", &token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");

    let missing = MessageId::new(9_999);
    let response = server
        .delete_auth(&format!("/api/chat/message/{missing}"), &token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .client
        .delete(format!("{}/api/chat/message/1", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_image_and_serve_it() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(ADA).unwrap();

    let response = server
        .upload(
            "/api/chat/upload",
            Some(&token),
            "image",
            "cat.png",
            "image/png",
            b"png-bytes".to_vec(),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("upload/chat/photo/"));
    assert!(url.ends_with("_cat.png"));

    let stored_name = url.rsplit('/').next().unwrap();
    assert!(server.upload_dir().join("chat/photo").join(stored_name).exists());

    let response = server.get(&format!("/{url}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"png-bytes");
}

#[tokio::test]
async fn test_upload_file() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(GRACE).unwrap();

    let response = server
        .upload(
            "/api/chat/upload/file",
            Some(&token),
            "file",
            "notes.pdf",
            "application/pdf",
            vec![1; 512],
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(body["url"].as_str().unwrap().starts_with("upload/chat/file/"));
}

#[tokio::test]
async fn test_upload_rejections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = server.token_for(ADA).unwrap();

    let response = server
        .upload("/api/chat/upload", None, "image", "cat.png", "image/png", vec![0; 16])
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .upload("/api/chat/upload", Some(&token), "image", "notes.txt", "text/plain", vec![0; 16])
        .await
        .unwrap();
    assert_status(response, StatusCode::UNSUPPORTED_MEDIA_TYPE).await.unwrap();

    let response = server
        .upload("/api/chat/upload", Some(&token), "photo", "cat.png", "image/png", vec![0; 16])
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .upload(
            "/api/chat/upload/file",
            Some(&token),
            "file",
            "big.bin",
            "application/octet-stream",
            vec![0; 4096],
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::PAYLOAD_TOO_LARGE).await.unwrap();
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
}
