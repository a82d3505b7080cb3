//! # campus-gateway
//!
//! Real-time layer of the activity chat: the room hub, per-connection
//! sessions with bounded delivery queues, and the lobby WebSocket route.

pub mod connection;
pub mod handlers;
pub mod hub;
pub mod protocol;
pub mod server;

pub use connection::{
    Connection, ConnectionId, ConnectionSession, ConnectionState, MessageRecorder, ServiceRecorder,
};
pub use handlers::{HandlerError, HandlerResult};
pub use hub::{spawn_hub, BroadcastEvent, Hub, HubHandle, HubStopped, RoomMember, RoomRegistry};
pub use protocol::{CloseCode, InboundMessage};
pub use server::{lobby_handler, lobby_routes, GatewayState, OriginPolicy};
