//! Room hub
//!
//! A single task owns room membership. Joins, leaves and broadcasts reach
//! it through one bounded intake channel and are applied strictly in
//! arrival order, so every member of a room sees that room's events in
//! the same order and no lock guards the membership table.

mod registry;

pub use registry::{DeliveryQueue, FanOut, RoomMember, RoomRegistry};

use std::sync::Arc;

use campus_core::RoomId;
use campus_service::ChatEnvelope;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::connection::ConnectionId;

/// Envelope addressed to every member of a room
#[derive(Debug, Clone)]
pub struct BroadcastEvent {
    pub room_id: RoomId,
    pub envelope: Arc<ChatEnvelope>,
}

impl BroadcastEvent {
    pub fn new(room_id: RoomId, envelope: ChatEnvelope) -> Self {
        Self {
            room_id,
            envelope: Arc::new(envelope),
        }
    }
}

/// The hub loop is no longer running
#[derive(Debug, Clone, Copy, Error)]
#[error("Hub has stopped")]
pub struct HubStopped;

enum HubCommand {
    Join {
        member: RoomMember,
        ack: oneshot::Sender<()>,
    },
    Leave {
        room_id: RoomId,
        connection_id: ConnectionId,
    },
    Broadcast(BroadcastEvent),
    MemberCount {
        room_id: RoomId,
        reply: oneshot::Sender<usize>,
    },
    RoomCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Hub loop state
pub struct Hub {
    commands: mpsc::Receiver<HubCommand>,
    registry: RoomRegistry,
}

impl Hub {
    /// Create a hub and the handle used to reach it
    ///
    /// `capacity` bounds the intake; senders wait when it is full.
    pub fn new(capacity: usize) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                commands: rx,
                registry: RoomRegistry::new(),
            },
            HubHandle { commands: tx },
        )
    }

    /// Apply commands until every handle has been dropped
    pub async fn run(mut self) {
        info!("Hub started");
        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }
        info!(rooms = self.registry.room_count(), "Hub stopped");
    }

    fn apply(&mut self, command: HubCommand) {
        match command {
            HubCommand::Join { member, ack } => {
                let room_id = member.room_id();
                let connection_id = member.connection_id();
                let user_id = member.user_id();
                if let Some(replaced) = self.registry.insert(member) {
                    warn!(
                        connection_id = %replaced,
                        room_id = %room_id,
                        "Connection joined twice; replaced"
                    );
                }
                debug!(
                    connection_id = %connection_id,
                    user_id = %user_id,
                    room_id = %room_id,
                    members = self.registry.member_count(room_id),
                    "Joined room"
                );
                let _ = ack.send(());
            }
            HubCommand::Leave {
                room_id,
                connection_id,
            } => {
                if self.registry.remove(room_id, connection_id) {
                    debug!(connection_id = %connection_id, room_id = %room_id, "Left room");
                }
            }
            HubCommand::Broadcast(event) => {
                let outcome = self.registry.fan_out(event.room_id, &event.envelope);
                for connection_id in &outcome.evicted {
                    warn!(
                        connection_id = %connection_id,
                        room_id = %event.room_id,
                        "Delivery queue full or closed; dropping member"
                    );
                }
                tracing::trace!(
                    room_id = %event.room_id,
                    message_id = %event.envelope.id,
                    delivered = outcome.delivered,
                    "Broadcast"
                );
            }
            HubCommand::MemberCount { room_id, reply } => {
                let _ = reply.send(self.registry.member_count(room_id));
            }
            HubCommand::RoomCount { reply } => {
                let _ = reply.send(self.registry.room_count());
            }
        }
    }
}

/// Cloneable handle to the hub loop
#[derive(Clone, Debug)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Admit a member to its room; resolves once the hub has applied it
    ///
    /// # Errors
    /// Returns `HubStopped` if the loop is gone
    pub async fn join(&self, member: RoomMember) -> Result<(), HubStopped> {
        let (ack, done) = oneshot::channel();
        self.send(HubCommand::Join { member, ack }).await?;
        done.await.map_err(|_| HubStopped)
    }

    /// Remove a member if present
    pub async fn leave(&self, room_id: RoomId, connection_id: ConnectionId) {
        if self
            .send(HubCommand::Leave {
                room_id,
                connection_id,
            })
            .await
            .is_err()
        {
            warn!(connection_id = %connection_id, "Leave after hub stopped");
        }
    }

    /// Queue an event for every member of its room
    pub async fn broadcast(&self, event: BroadcastEvent) {
        let room_id = event.room_id;
        if self.send(HubCommand::Broadcast(event)).await.is_err() {
            warn!(room_id = %room_id, "Broadcast after hub stopped; event dropped");
        }
    }

    /// Number of members in a room
    ///
    /// # Errors
    /// Returns `HubStopped` if the loop is gone
    pub async fn member_count(&self, room_id: RoomId) -> Result<usize, HubStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::MemberCount { room_id, reply }).await?;
        rx.await.map_err(|_| HubStopped)
    }

    /// Number of rooms with at least one member
    ///
    /// # Errors
    /// Returns `HubStopped` if the loop is gone
    pub async fn room_count(&self) -> Result<usize, HubStopped> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::RoomCount { reply }).await?;
        rx.await.map_err(|_| HubStopped)
    }

    /// Check whether the loop is still receiving
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubStopped> {
        self.commands.send(command).await.map_err(|_| HubStopped)
    }
}

/// Start a hub on the current Tokio runtime
pub fn spawn_hub(capacity: usize) -> HubHandle {
    let (hub, handle) = Hub::new(capacity);
    tokio::spawn(hub.run());
    handle
}
