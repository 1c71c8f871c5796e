//! Live connections and their admitted identity.
//!
//! The registry never holds a socket. Each connection is represented by the
//! sending half of its bounded outbound channel; the WebSocket task owning
//! the receiver writes events to the wire. Delivery is exposed to the rest of
//! the broker through the [`EventSink`] capability.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{ConnectionId, EmailDomain, Identity, ServerEvent};
use crate::error::AdmissionError;

/// Sending half of a connection's outbound event channel.
pub type Outbound = mpsc::Sender<ServerEvent>;

/// Fire-and-forget delivery of events to connections by id.
pub trait EventSink: fmt::Debug + Send + Sync {
    /// Sends `event` to `to`. Returns `false` if it was dropped because the
    /// target is not live or its channel is full.
    fn send(&self, to: ConnectionId, event: ServerEvent) -> bool;
}

#[derive(Debug)]
struct LiveConnection {
    outbound: Outbound,
    identity: Option<Identity>,
}

/// Tracks live connections and performs admission.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, LiveConnection>,
    domain: EmailDomain,
}

impl ConnectionRegistry {
    /// Creates an empty registry admitting emails of `domain`.
    #[must_use]
    pub fn new(domain: EmailDomain) -> Self {
        Self {
            connections: HashMap::new(),
            domain,
        }
    }

    /// Registers a freshly accepted connection. Re-registering an id
    /// replaces its channel and clears its admission.
    pub fn register(&mut self, connection_id: ConnectionId, outbound: Outbound) {
        self.connections.insert(
            connection_id,
            LiveConnection {
                outbound,
                identity: None,
            },
        );
    }

    /// Admits `connection_id` under `email`.
    ///
    /// A rejected connection stays registered and may retry.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::UnknownConnection`] if the connection is not live.
    /// - [`AdmissionError::AlreadyAdmitted`] if it was admitted before.
    /// - [`AdmissionError::InvalidDomain`] if `email` is outside the domain.
    pub fn admit(
        &mut self,
        connection_id: ConnectionId,
        email: &str,
    ) -> Result<Identity, AdmissionError> {
        let connection = self
            .connections
            .get_mut(&connection_id)
            .ok_or(AdmissionError::UnknownConnection(connection_id))?;
        if connection.identity.is_some() {
            return Err(AdmissionError::AlreadyAdmitted(connection_id));
        }
        if !self.domain.accepts(email) {
            return Err(AdmissionError::InvalidDomain {
                email: email.to_string(),
            });
        }
        let identity = Identity::new(connection_id, email);
        connection.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Returns the admitted identity of `connection_id`.
    #[must_use]
    pub fn identity(&self, connection_id: ConnectionId) -> Option<&Identity> {
        self.connections
            .get(&connection_id)
            .and_then(|c| c.identity.as_ref())
    }

    /// Returns `true` if `connection_id` is registered.
    #[must_use]
    pub fn is_live(&self, connection_id: ConnectionId) -> bool {
        self.connections.contains_key(&connection_id)
    }

    /// Drops `connection_id`, returning its identity if it was admitted.
    /// Removing an unknown id is a no-op.
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Identity> {
        self.connections
            .remove(&connection_id)
            .and_then(|c| c.identity)
    }

    /// Number of live connections, admitted or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if no connection is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// The admission domain.
    #[must_use]
    pub fn domain(&self) -> &EmailDomain {
        &self.domain
    }
}

impl EventSink for ConnectionRegistry {
    fn send(&self, to: ConnectionId, event: ServerEvent) -> bool {
        let Some(connection) = self.connections.get(&to) else {
            tracing::debug!(%to, event = event.name(), "target not live, event dropped");
            return false;
        };
        match connection.outbound.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(%to, event = event.name(), "outbound channel full, event dropped");
                false
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!(%to, event = event.name(), "outbound channel closed, event dropped");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn registry() -> ConnectionRegistry {
        let Ok(domain) = EmailDomain::new("vitbhopal.ac.in") else {
            panic!("valid domain");
        };
        ConnectionRegistry::new(domain)
    }

    #[test]
    fn admits_domain_email() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, _rx) = mpsc::channel(4);
        reg.register(id, tx);

        let Ok(identity) = reg.admit(id, "a@vitbhopal.ac.in") else {
            panic!("admission should succeed");
        };
        assert_eq!(identity.connection_id, id);
        assert_eq!(reg.identity(id), Some(&identity));
    }

    #[test]
    fn rejects_foreign_domain_but_keeps_connection() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, _rx) = mpsc::channel(4);
        reg.register(id, tx);

        let result = reg.admit(id, "a@gmail.com");
        assert!(matches!(result, Err(AdmissionError::InvalidDomain { .. })));
        assert!(reg.is_live(id));
        assert!(reg.identity(id).is_none());

        // May retry with a valid address.
        assert!(reg.admit(id, "a@vitbhopal.ac.in").is_ok());
    }

    #[test]
    fn rejects_second_admission() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, _rx) = mpsc::channel(4);
        reg.register(id, tx);
        let _ = reg.admit(id, "a@vitbhopal.ac.in");

        let result = reg.admit(id, "b@vitbhopal.ac.in");
        assert!(matches!(result, Err(AdmissionError::AlreadyAdmitted(_))));
        assert_eq!(reg.identity(id).map(|i| i.email.as_str()), Some("a@vitbhopal.ac.in"));
    }

    #[test]
    fn rejects_unknown_connection() {
        let mut reg = registry();
        let result = reg.admit(ConnectionId::new(), "a@vitbhopal.ac.in");
        assert!(matches!(result, Err(AdmissionError::UnknownConnection(_))));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, _rx) = mpsc::channel(4);
        reg.register(id, tx);
        let _ = reg.admit(id, "a@vitbhopal.ac.in");

        assert!(reg.remove(id).is_some());
        assert!(reg.remove(id).is_none());
        assert!(!reg.is_live(id));
        assert!(reg.is_empty());
    }

    #[test]
    fn send_delivers_to_live_connection() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, mut rx) = mpsc::channel(4);
        reg.register(id, tx);

        assert!(reg.send(id, ServerEvent::PartnerDisconnected));
        assert_eq!(rx.try_recv().ok(), Some(ServerEvent::PartnerDisconnected));
    }

    #[test]
    fn send_to_unknown_is_dropped() {
        let reg = registry();
        assert!(!reg.send(ConnectionId::new(), ServerEvent::PartnerDisconnected));
    }

    #[test]
    fn send_to_full_channel_is_dropped() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, mut rx) = mpsc::channel(1);
        reg.register(id, tx);

        assert!(reg.send(id, ServerEvent::PartnerDisconnected));
        assert!(!reg.send(id, ServerEvent::PartnerDisconnected));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_to_closed_channel_is_dropped() {
        let mut reg = registry();
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(1);
        reg.register(id, tx);
        drop(rx);

        assert!(!reg.send(id, ServerEvent::PartnerDisconnected));
    }
}
