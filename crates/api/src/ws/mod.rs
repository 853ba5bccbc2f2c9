//! WebSocket infrastructure for real-time vital-sign delivery.
//!
//! The hub coordinates subscriber membership and fan-out; connections own
//! their transport lifecycle; the heartbeat task keeps liveness probes
//! flowing.

mod connection;
mod heartbeat;
pub mod hub;

pub use connection::stream_handler;
pub use heartbeat::start_heartbeat;
pub use hub::{Hub, PushMessage};
