//! Domain layer: identities, the waiting pool, pairings, and delivery.
//!
//! These types hold no locks of their own (except the polling lobby) and
//! are mutated only through the single-writer [`crate::service::Broker`].

pub mod connection_id;
pub mod connection_registry;
pub mod email_domain;
pub mod identity;
pub mod lobby;
pub mod matchmaker;
pub mod pairing;
pub mod pairing_table;
pub mod server_event;
pub mod signal;
pub mod waiting_pool;

pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, EventSink, Outbound};
pub use email_domain::EmailDomain;
pub use identity::{Identity, PublicIdentity};
pub use lobby::{LobbyEntry, LobbyOutcome, PollingLobby};
pub use pairing::{Pairing, PairingId};
pub use pairing_table::PairingTable;
pub use server_event::ServerEvent;
pub use signal::SignalKind;
pub use waiting_pool::WaitingPool;
