//! Broker service: the single-writer gate in front of [`Broker`].

use tokio::sync::Mutex;

use super::broker::{Broker, BrokerStats};
use crate::domain::{ConnectionId, Identity, Outbound, Pairing, PairingId, SignalKind};
use crate::error::AdmissionError;

/// Shared handle used by every connection task and HTTP handler.
///
/// All broker state sits behind one mutex that each operation takes exactly
/// once. Operations never await while holding it (sends are `try_send`), so
/// the critical sections stay short and a `findMatch` can never interleave
/// with an `endPairing` for the same identity.
#[derive(Debug)]
pub struct BrokerService {
    broker: Mutex<Broker>,
}

impl BrokerService {
    /// Wraps `broker`.
    #[must_use]
    pub fn new(broker: Broker) -> Self {
        Self {
            broker: Mutex::new(broker),
        }
    }

    /// Registers a newly accepted connection.
    pub async fn connect(&self, connection_id: ConnectionId, outbound: Outbound) {
        self.broker.lock().await.connect(connection_id, outbound);
    }

    /// Client `join`.
    ///
    /// # Errors
    ///
    /// Returns the [`AdmissionError`] already reported to the client as
    /// `joinError`.
    pub async fn join(
        &self,
        connection_id: ConnectionId,
        email: &str,
    ) -> Result<Identity, AdmissionError> {
        self.broker.lock().await.join(connection_id, email)
    }

    /// Client `findPartner`.
    pub async fn find_partner(&self, connection_id: ConnectionId) -> Option<PairingId> {
        self.broker.lock().await.find_partner(connection_id)
    }

    /// Client `offer` / `answer` / `ice-candidate`.
    pub async fn relay(
        &self,
        kind: SignalKind,
        sender: ConnectionId,
        target: ConnectionId,
        payload: serde_json::Value,
    ) -> bool {
        self.broker.lock().await.relay(kind, sender, target, payload)
    }

    /// Client `endChat`.
    pub async fn end_chat(&self, connection_id: ConnectionId) -> Option<Pairing> {
        self.broker.lock().await.end_pairing(connection_id)
    }

    /// Client `report`.
    pub async fn report(
        &self,
        reporter: ConnectionId,
        reported: ConnectionId,
        reason: &str,
    ) -> Option<Pairing> {
        self.broker
            .lock()
            .await
            .handle_report(reporter, reported, reason)
    }

    /// Transport-raised disconnect.
    pub async fn disconnect(&self, connection_id: ConnectionId) {
        self.broker.lock().await.handle_disconnect(connection_id);
    }

    /// Current participant counts.
    pub async fn stats(&self) -> BrokerStats {
        self.broker.lock().await.stats()
    }

    #[cfg(test)]
    async fn assert_invariants(&self) {
        self.broker.lock().await.assert_invariants();
    }
}
