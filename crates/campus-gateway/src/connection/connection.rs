//! Individual lobby connection
//!
//! Identity and lifecycle state of one WebSocket client in one room.

use campus_common::Identity;
use campus_core::{RoomId, UserId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Server-assigned connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Connection state
///
/// Only moves forward: `Connecting -> Joined -> Leaving -> Closed`, or
/// straight from `Connecting` to `Leaving` when the join never happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Authenticated, not yet a room member
    Connecting,
    /// Member of its room
    Joined,
    /// Leaving the room and flushing
    Leaving,
    /// Terminal
    Closed,
}

impl ConnectionState {
    /// Check whether `next` is a legal successor
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Joined | Self::Leaving)
                | (Self::Joined, Self::Leaving)
                | (Self::Leaving, Self::Closed)
        )
    }
}

/// A single lobby connection
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    room_id: RoomId,
    identity: Identity,
    state: Mutex<ConnectionState>,
    created_at: Instant,
}

impl Connection {
    /// Create a new connection in the `Connecting` state
    pub fn new(room_id: RoomId, identity: Identity) -> Arc<Self> {
        Arc::new(Self {
            id: ConnectionId::generate(),
            room_id,
            identity,
            state: Mutex::new(ConnectionState::Connecting),
            created_at: Instant::now(),
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Authenticated caller
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    /// Get the current state
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Move to `next`; returns false and leaves the state untouched if the
    /// transition would go backwards or skip `Leaving`
    pub fn advance(&self, next: ConnectionState) -> bool {
        let mut state = self.state.lock();
        if state.can_advance_to(next) {
            tracing::trace!(connection_id = %self.id, from = ?*state, to = ?next, "State change");
            *state = next;
            true
        } else {
            false
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state() == ConnectionState::Closed
    }

    /// How long the connection has existed
    pub fn connected_for(&self) -> Duration {
        self.created_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Arc<Connection> {
        Connection::new(RoomId::new(7), Identity::new(UserId::new(1), "B6500001", "student"))
    }

    #[test]
    fn test_forward_transitions() {
        let conn = connection();
        assert_eq!(conn.state(), ConnectionState::Connecting);
        assert!(conn.advance(ConnectionState::Joined));
        assert!(conn.advance(ConnectionState::Leaving));
        assert!(conn.advance(ConnectionState::Closed));
        assert!(conn.is_closed());
    }

    #[test]
    fn test_closed_is_terminal() {
        let conn = connection();
        conn.advance(ConnectionState::Joined);
        conn.advance(ConnectionState::Leaving);
        conn.advance(ConnectionState::Closed);
        assert!(!conn.advance(ConnectionState::Joined));
        assert!(!conn.advance(ConnectionState::Leaving));
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_no_backward_or_skipping() {
        let conn = connection();
        assert!(!conn.advance(ConnectionState::Closed));
        assert!(conn.advance(ConnectionState::Joined));
        assert!(!conn.advance(ConnectionState::Closed));
        assert!(!conn.advance(ConnectionState::Connecting));
        assert!(conn.advance(ConnectionState::Leaving));
        assert!(!conn.advance(ConnectionState::Joined));
        assert!(!conn.advance(ConnectionState::Leaving));
    }

    #[test]
    fn test_leave_without_join() {
        let conn = connection();
        assert!(conn.advance(ConnectionState::Leaving));
        assert!(conn.advance(ConnectionState::Closed));
    }

    #[test]
    fn test_identity_accessors() {
        let conn = connection();
        assert_eq!(conn.room_id(), RoomId::new(7));
        assert_eq!(conn.user_id(), UserId::new(1));
        assert_eq!(conn.identity().sut_id, "B6500001");
        assert_ne!(conn.id(), connection().id());
    }
}
