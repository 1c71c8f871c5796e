//! # meet-broker
//!
//! Matchmaking and signaling broker for one-to-one video chat.
//!
//! Participants connect over WebSocket, are admitted by email domain, wait
//! in a FIFO pool, are paired with a partner, and then exchange session
//! descriptions and ICE candidates through the broker. A second, polling
//! transport under `/api/matchmaking` pairs emails into named rooms for an
//! external session service.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BrokerService (service/)        PollingLobby (domain/)
//!     │     └── Broker
//!     │
//!     ├── ConnectionRegistry (domain/)
//!     ├── WaitingPool (domain/)
//!     └── PairingTable (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod router;
pub mod service;
pub mod ws;
