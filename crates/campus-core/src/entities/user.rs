//! Chat user - the subset of a platform account the chat needs

use crate::value_objects::UserId;

/// Name shown for senders whose account can no longer be found
pub const UNKNOWN_USER_NAME: &str = "Unknown";

/// Read-only view of a platform user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: UserId,
    /// Institutional (student/staff) id
    pub sut_id: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
}

impl ChatUser {
    /// Full display name: "First Last"
    pub fn display_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", "") => UNKNOWN_USER_NAME.to_string(),
            (first, "") => first.to_string(),
            ("", last) => last.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Avatar reference, empty when the user has none
    pub fn avatar(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or_default()
    }
}
