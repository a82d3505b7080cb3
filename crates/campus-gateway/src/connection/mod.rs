//! Lobby connections
//!
//! A connection's lifecycle state, the recorder it stores messages through,
//! and the session that drives its reader and writer tasks.

mod connection;
mod recorder;
mod session;

pub use connection::{Connection, ConnectionId, ConnectionState};
pub use recorder::{MessageRecorder, ServiceRecorder};
pub use session::ConnectionSession;
