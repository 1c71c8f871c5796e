//! Service layer: the broker state machine and its single-writer gate.
//!
//! [`Broker`] implements admission, matchmaking, relay, and teardown over
//! the domain types; [`BrokerService`] serializes every caller behind one
//! lock.

pub mod broker;
pub mod broker_service;

pub use broker::{Broker, BrokerStats};
pub use broker_service::BrokerService;
