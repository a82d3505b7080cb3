//! Test fixtures and data generators
//!
//! Seed data shared by the integration tests.

use campus_core::{MessageKind, MessageId, PostId, RoomId, UserId};
use campus_service::testing::InMemoryStore;
use chrono::{Duration, Utc};
use serde::Serialize;

/// Post whose chat room most tests use
pub const POST_ID: i64 = 7;
pub const ROOM_ID: i64 = 7;

/// A second, unrelated room
pub const OTHER_POST_ID: i64 = 19;
pub const OTHER_ROOM_ID: i64 = 9;

/// Post with no chat room
pub const MISSING_POST_ID: i64 = 404;

/// A seeded student
#[derive(Debug, Clone, Copy)]
pub struct Student {
    pub id: i64,
    pub sut_id: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

impl Student {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.id)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn avatar(&self) -> String {
        format!("upload/avatars/{}.png", self.first_name.to_lowercase())
    }
}

pub const ADA: Student = Student {
    id: 1,
    sut_id: "B6500001",
    first_name: "Ada",
    last_name: "Lovelace",
};

pub const GRACE: Student = Student {
    id: 2,
    sut_id: "B6500002",
    first_name: "Grace",
    last_name: "Hopper",
};

/// Users and rooms every test starts with
pub fn seed(store: &InMemoryStore) {
    for student in [ADA, GRACE] {
        store.add_user(
            student.user_id(),
            student.sut_id,
            student.first_name,
            student.last_name,
        );
    }
    store.add_room(RoomId::new(ROOM_ID), PostId::new(POST_ID));
    store.add_room(RoomId::new(OTHER_ROOM_ID), PostId::new(OTHER_POST_ID));
}

/// Store a text message in the main room sent `age` ago
pub fn seed_message(
    store: &InMemoryStore,
    author: Student,
    body: &str,
    age: Duration,
) -> MessageId {
    store.add_message(
        RoomId::new(ROOM_ID),
        author.user_id(),
        body,
        MessageKind::Text,
        Utc::now() - age,
    )
}

/// Frame a client sends over the lobby socket
#[derive(Debug, Serialize)]
pub struct OutgoingMessage {
    pub body: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl OutgoingMessage {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            kind: "text".to_string(),
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self {
            body: url.into(),
            kind: "image".to_string(),
        }
    }
}
