//! WebSocket layer: connection handling and client event decoding.
//!
//! The WebSocket endpoint at `/ws` is the persistent signaling channel:
//! admission, matchmaking requests, relayed session-establishment messages,
//! and lifecycle events all travel over it.

pub mod connection;
pub mod handler;
pub mod messages;
