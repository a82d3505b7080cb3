//! WebSocket close codes
//!
//! Application-range close codes sent when the server ends a lobby connection.

use serde::{Deserialize, Serialize};

/// Lobby WebSocket close codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum CloseCode {
    /// Unknown error occurred
    UnknownError = 4000,
    /// Frame was not a valid inbound message
    DecodeError = 4002,
    /// Invalid or missing token
    AuthenticationFailed = 4004,
    /// Client could not keep up with its room and was dropped
    RateLimited = 4008,
    /// No chat room exists for the requested post
    RoomNotFound = 4010,
}

impl CloseCode {
    /// Get the raw u16 value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Get the description for this close code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownError => "Unknown error occurred",
            Self::DecodeError => "Invalid payload encoding",
            Self::AuthenticationFailed => "Authentication failed",
            Self::RateLimited => "Too slow to receive room messages",
            Self::RoomNotFound => "Chat room not found",
        }
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_as_u16() {
        assert_eq!(CloseCode::DecodeError.as_u16(), 4002);
        assert_eq!(u16::from(CloseCode::AuthenticationFailed), 4004);
    }

    #[test]
    fn test_close_code_display() {
        let display = CloseCode::RateLimited.to_string();
        assert!(display.contains("4008"));
    }
}
