//! Room membership table
//!
//! Owned by the hub loop; nothing else reads or writes it.

use std::collections::HashMap;
use std::sync::Arc;

use campus_core::{RoomId, UserId};
use campus_service::ChatEnvelope;
use tokio::sync::{mpsc, oneshot};

use crate::connection::ConnectionId;

/// Delivery queue sender of one connection
pub type DeliveryQueue = mpsc::Sender<Arc<ChatEnvelope>>;

/// Hub-side handle on a joined connection
///
/// Dropping it closes the connection's delivery queue (the writer drains
/// what is left and stops) and fires the eviction signal.
#[derive(Debug)]
pub struct RoomMember {
    connection_id: ConnectionId,
    room_id: RoomId,
    user_id: UserId,
    queue: DeliveryQueue,
    evict: Option<oneshot::Sender<()>>,
}

impl RoomMember {
    pub fn new(
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: UserId,
        queue: DeliveryQueue,
        evict: oneshot::Sender<()>,
    ) -> Self {
        Self {
            connection_id,
            room_id,
            user_id,
            queue,
            evict: Some(evict),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Tell the session it has been dropped from the room
    fn evict(mut self) {
        if let Some(evict) = self.evict.take() {
            let _ = evict.send(());
        }
    }
}

/// Outcome of a fan-out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FanOut {
    pub delivered: usize,
    pub evicted: Vec<ConnectionId>,
}

/// Members by room, then by connection
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashMap<ConnectionId, RoomMember>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to its room
    ///
    /// Returns the member previously registered under the same connection
    /// id, which has already been evicted.
    pub fn insert(&mut self, member: RoomMember) -> Option<ConnectionId> {
        let previous = self
            .rooms
            .entry(member.room_id)
            .or_default()
            .insert(member.connection_id, member);
        previous.map(|old| {
            let id = old.connection_id;
            old.evict();
            id
        })
    }

    /// Remove a member; empty rooms are dropped
    pub fn remove(&mut self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(&room_id) else {
            return false;
        };
        let removed = members.remove(&connection_id);
        if members.is_empty() {
            self.rooms.remove(&room_id);
        }
        match removed {
            Some(member) => {
                member.evict();
                true
            }
            None => false,
        }
    }

    /// Offer `envelope` to every member of `room_id` without waiting
    ///
    /// Members whose queue is full or closed are removed and evicted.
    pub fn fan_out(&mut self, room_id: RoomId, envelope: &Arc<ChatEnvelope>) -> FanOut {
        let mut outcome = FanOut::default();
        let Some(members) = self.rooms.get_mut(&room_id) else {
            return outcome;
        };

        for (id, member) in members.iter() {
            if member.queue.try_send(Arc::clone(envelope)).is_ok() {
                outcome.delivered += 1;
            } else {
                outcome.evicted.push(*id);
            }
        }

        for id in &outcome.evicted {
            if let Some(member) = members.remove(id) {
                member.evict();
            }
        }
        if members.is_empty() {
            self.rooms.remove(&room_id);
        }

        outcome
    }

    pub fn member_count(&self, room_id: RoomId) -> usize {
        self.rooms.get(&room_id).map_or(0, HashMap::len)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn contains(&self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        self.rooms
            .get(&room_id)
            .is_some_and(|members| members.contains_key(&connection_id))
    }
}
