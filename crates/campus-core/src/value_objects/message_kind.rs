//! Message kind - classifies chat message content

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a chat message carries
///
/// Stored as a numeric type id (`messages_types` table) and exchanged with
/// clients as a lowercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    /// Body is a reference path to an uploaded image
    Image,
    /// Body is a reference path to an uploaded file
    File,
}

impl MessageKind {
    /// Numeric type id as persisted
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Self::Text => 1,
            Self::Image => 2,
            Self::File => 3,
        }
    }

    /// Resolve a persisted type id
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Text),
            2 => Some(Self::Image),
            3 => Some(Self::File),
            _ => None,
        }
    }

    /// Wire tag
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
        }
    }

    /// Resolve a wire tag, falling back to text for anything unrecognized
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "file" => Self::File,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
