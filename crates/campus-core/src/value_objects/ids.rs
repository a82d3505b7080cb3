//! Identifier newtypes
//!
//! Every row in the platform is keyed by a 64-bit integer assigned by the
//! database. Wrapping each one in its own type keeps a room id from being
//! passed where a user id is expected.
//!
//! On the wire the ids are plain JSON numbers. Deserialization also accepts
//! a numeric string, since some clients stringify ids taken from URLs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Error when parsing an identifier from a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("invalid identifier format")]
    InvalidFormat,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(i64);

        impl $name {
            /// Create from a raw i64 value
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Parse from string representation
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| IdParseError::InvalidFormat)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_i64(self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(IdVisitor($label)).map(Self)
            }
        }
    };
}

struct IdVisitor(&'static str);

impl serde::de::Visitor<'_> for IdVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an integer or numeric string representing a {}", self.0)
    }

    fn visit_i64<E>(self, value: i64) -> Result<i64, E>
    where
        E: serde::de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<i64, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value).map_err(|_| E::custom(format!("{} out of range", self.0)))
    }

    fn visit_str<E>(self, value: &str) -> Result<i64, E>
    where
        E: serde::de::Error,
    {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("invalid {} string", self.0)))
    }
}

define_id!(
    /// Platform user account id
    UserId,
    "user id"
);

define_id!(
    /// Activity post id; each post owns at most one chat room
    PostId,
    "post id"
);

define_id!(
    /// Chat room id; the broadcast scope of the hub
    RoomId,
    "room id"
);

define_id!(
    /// Persisted chat message id
    MessageId,
    "message id"
);
