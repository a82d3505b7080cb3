//! Lobby wire protocol
//!
//! Inbound frames are small JSON objects; outbound frames are
//! `campus_service::ChatEnvelope` values.

mod close_codes;
mod messages;

pub use close_codes::CloseCode;
pub use messages::{close_frame, encode_envelope, InboundMessage};
