//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::PollingLobby;
use crate::service::BrokerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Socket broker (connections, waiting pool, pairings).
    pub broker: Arc<BrokerService>,
    /// Lobby for the polling matchmaking transport.
    pub lobby: Arc<PollingLobby>,
    /// Outbound channel capacity for new WebSocket connections.
    pub outbound_buffer: usize,
}
