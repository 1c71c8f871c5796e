//! Broker state machine: admission, matchmaking, relay, and teardown.
//!
//! [`Broker`] owns every piece of registry state (connections, waiting pool,
//! pairing table) and exposes the operations that mutate it. Each operation
//! runs to completion on `&mut self`; [`super::BrokerService`] serializes
//! callers behind one lock so no two operations ever interleave.
//!
//! Per-identity lifecycle:
//!
//! ```text
//! Unadmitted ──join──▶ Waiting ──match──▶ Paired
//!                         ▲                 │
//!                         └────endPairing───┘
//! any state ──disconnect──▶ Gone
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::matchmaker;
use crate::domain::{
    ConnectionId, ConnectionRegistry, EmailDomain, EventSink, Identity, Outbound, Pairing,
    PairingId, PairingTable, ServerEvent, SignalKind, WaitingPool,
};
use crate::error::AdmissionError;

/// Point-in-time participant counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStats {
    /// Identities in the waiting pool.
    pub waiting_users: usize,
    /// Active pairings.
    pub active_pairings: usize,
    /// `waiting_users + 2 * active_pairings`.
    pub total_users: usize,
}

/// The broker's complete in-memory state.
#[derive(Debug)]
pub struct Broker {
    connections: ConnectionRegistry,
    waiting: WaitingPool,
    pairings: PairingTable,
}

impl Broker {
    /// Creates an empty broker admitting emails of `domain`.
    #[must_use]
    pub fn new(domain: EmailDomain) -> Self {
        Self {
            connections: ConnectionRegistry::new(domain),
            waiting: WaitingPool::new(),
            pairings: PairingTable::new(),
        }
    }

    /// Registers a newly accepted connection with its outbound channel.
    pub fn connect(&mut self, connection_id: ConnectionId, outbound: Outbound) {
        self.connections.register(connection_id, outbound);
        tracing::debug!(%connection_id, "connection registered");
    }

    /// Handles `join`: admits the connection, enqueues it, confirms with
    /// `joinSuccess`, then tries to match it.
    ///
    /// On rejection the connection receives `joinError` and stays connected
    /// but unadmitted.
    ///
    /// # Errors
    ///
    /// Returns the [`AdmissionError`] that was reported to the client.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        email: &str,
    ) -> Result<Identity, AdmissionError> {
        let identity = match self.connections.admit(connection_id, email) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(%connection_id, %err, "admission rejected");
                self.connections.send(
                    connection_id,
                    ServerEvent::JoinError {
                        message: err.to_string(),
                    },
                );
                return Err(err);
            }
        };

        tracing::info!(%connection_id, email, "participant admitted");
        self.enqueue(identity.clone());
        self.connections
            .send(connection_id, ServerEvent::JoinSuccess { user_id: connection_id });
        self.find_match(&identity);
        Ok(identity)
    }

    /// Appends `identity` to the waiting pool unless it is paired or already
    /// waiting. Returns `true` if it was added.
    pub fn enqueue(&mut self, identity: Identity) -> bool {
        if self.pairings.is_paired(identity.connection_id) {
            return false;
        }
        self.waiting.push_back(identity)
    }

    /// Handles `findPartner`. Only a waiting connection can look for a
    /// partner; anything else is ignored.
    pub fn find_partner(&mut self, connection_id: ConnectionId) -> Option<PairingId> {
        let Some(identity) = self.waiting.get(connection_id).cloned() else {
            tracing::debug!(%connection_id, "findPartner ignored, connection is not waiting");
            return None;
        };
        self.find_match(&identity)
    }

    /// Pairs `seeker` with the first eligible waiting identity.
    ///
    /// Does nothing if `seeker` is already paired. When no partner is
    /// available `seeker` keeps its place in (or absence from) the pool.
    pub fn find_match(&mut self, seeker: &Identity) -> Option<PairingId> {
        if self.pairings.is_paired(seeker.connection_id) {
            return None;
        }
        let Some(partner) =
            matchmaker::select_partner(&self.waiting, &self.pairings, seeker).cloned()
        else {
            tracing::debug!(
                connection_id = %seeker.connection_id,
                waiting = self.waiting.len(),
                "no partner available"
            );
            return None;
        };
        self.create_pairing(seeker.clone(), partner)
    }

    fn create_pairing(&mut self, a: Identity, b: Identity) -> Option<PairingId> {
        let pairing_id = match self.pairings.insert(a.clone(), b.clone()) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, "pairing rejected");
                return None;
            }
        };
        self.waiting.remove(a.connection_id);
        self.waiting.remove(b.connection_id);

        tracing::info!(
            %pairing_id,
            member_a = %a.connection_id,
            member_b = %b.connection_id,
            "pairing created"
        );

        self.connections
            .send(a.connection_id, ServerEvent::Matched { user: b.public() });
        self.connections
            .send(b.connection_id, ServerEvent::Matched { user: a.public() });
        Some(pairing_id)
    }

    /// Forwards an opaque signaling payload to `target`, tagged with
    /// `sender`.
    ///
    /// Best effort: the target does not have to be the sender's partner, and
    /// an unreachable target drops the message without telling the sender.
    /// Messages from unadmitted connections are dropped as well. Returns
    /// `true` if the message was queued for delivery.
    pub fn relay(
        &self,
        kind: SignalKind,
        sender: ConnectionId,
        target: ConnectionId,
        payload: serde_json::Value,
    ) -> bool {
        if self.connections.identity(sender).is_none() {
            tracing::debug!(%kind, %sender, "relay from unadmitted connection dropped");
            return false;
        }
        let delivered = self
            .connections
            .send(target, kind.into_event(sender, payload));
        tracing::debug!(%kind, %sender, %target, delivered, "relay");
        delivered
    }

    /// Ends the pairing `connection_id` belongs to.
    ///
    /// Both members receive `partnerDisconnected`, the pairing and both index
    /// entries are removed, and every member that is still connected goes
    /// back to the end of the waiting pool. Returns the removed pairing, or
    /// `None` if the connection was not paired.
    pub fn end_pairing(&mut self, connection_id: ConnectionId) -> Option<Pairing> {
        let pairing = self.pairings.remove_for(connection_id)?;

        for member in pairing.members() {
            self.connections
                .send(member.connection_id, ServerEvent::PartnerDisconnected);
        }
        for member in pairing.members() {
            if self.connections.is_live(member.connection_id) {
                self.enqueue(member.clone());
            }
        }

        let lasted = chrono::Utc::now() - pairing.created_at;
        tracing::info!(
            pairing_id = %pairing.id,
            ended_by = %connection_id,
            duration_secs = lasted.num_seconds(),
            "pairing ended"
        );
        Some(pairing)
    }

    /// Handles a transport-raised disconnect.
    ///
    /// The connection leaves the waiting pool and the registry before its
    /// pairing is ended, so only the surviving partner is requeued.
    /// Idempotent.
    pub fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        self.waiting.remove(connection_id);
        let identity = self.connections.remove(connection_id);
        self.end_pairing(connection_id);
        tracing::info!(
            %connection_id,
            admitted = identity.is_some(),
            "connection closed"
        );
    }

    /// Handles `report`: ends the reported connection's pairing. Nothing is
    /// recorded.
    pub fn handle_report(
        &mut self,
        reporter: ConnectionId,
        reported: ConnectionId,
        reason: &str,
    ) -> Option<Pairing> {
        tracing::info!(%reporter, %reported, reason, "report received");
        self.end_pairing(reported)
    }

    /// Current counts. Pure read.
    #[must_use]
    pub fn stats(&self) -> BrokerStats {
        let waiting_users = self.waiting.len();
        let active_pairings = self.pairings.len();
        BrokerStats {
            waiting_users,
            active_pairings,
            total_users: waiting_users + 2 * active_pairings,
        }
    }

    /// Returns `true` if `connection_id` is in the waiting pool.
    #[must_use]
    pub fn is_waiting(&self, connection_id: ConnectionId) -> bool {
        self.waiting.contains(connection_id)
    }

    /// Returns the pairing `connection_id` belongs to.
    #[must_use]
    pub fn pairing_of(&self, connection_id: ConnectionId) -> Option<&Pairing> {
        self.pairings.pairing_of(connection_id)
    }

    /// Waiting connection ids in scan order.
    #[must_use]
    pub fn waiting_ids(&self) -> Vec<ConnectionId> {
        self.waiting.iter().map(|i| i.connection_id).collect()
    }

    /// Number of live connections, admitted or not.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Checks every registry invariant.
    #[cfg(test)]
    #[allow(clippy::panic)]
    pub(crate) fn assert_invariants(&self) {
        for waiting in self.waiting.iter() {
            assert!(
                !self.pairings.is_paired(waiting.connection_id),
                "{} is both waiting and paired",
                waiting.connection_id
            );
            assert!(self.connections.is_live(waiting.connection_id));
        }
        let mut indexed = 0;
        for pairing in self.pairings.iter() {
            assert_ne!(pairing.member_a.connection_id, pairing.member_b.connection_id);
            assert_ne!(pairing.member_a.email, pairing.member_b.email);
            for member in pairing.members() {
                assert_eq!(
                    self.pairings.pairing_of(member.connection_id).map(|p| p.id),
                    Some(pairing.id)
                );
                assert!(self.connections.is_live(member.connection_id));
                indexed += 1;
            }
        }
        assert_eq!(indexed, self.pairings.indexed_len());
        let stats = self.stats();
        assert_eq!(stats.total_users, stats.waiting_users + 2 * stats.active_pairings);
    }
}
