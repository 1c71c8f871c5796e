//! Active pairings plus the per-connection index into them.
//!
//! [`PairingTable`] owns both the pairing map and the `connection → pairing`
//! index and only mutates them together, so a member is indexed if and only
//! if its pairing exists.

use std::collections::HashMap;

use chrono::Utc;

use super::{ConnectionId, Identity, Pairing, PairingId};
use crate::error::PairingError;

/// Pairing storage with a symmetric member index.
#[derive(Debug, Default)]
pub struct PairingTable {
    pairings: HashMap<PairingId, Pairing>,
    index: HashMap<ConnectionId, PairingId>,
    next_id: u64,
}

impl PairingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new pairing between `a` and `b` and indexes both members.
    ///
    /// # Errors
    ///
    /// - [`PairingError::SameConnection`] if both members are one connection.
    /// - [`PairingError::SameEmail`] if both members share an email.
    /// - [`PairingError::AlreadyPaired`] if either member already has a pairing.
    pub fn insert(&mut self, a: Identity, b: Identity) -> Result<PairingId, PairingError> {
        if a.connection_id == b.connection_id {
            return Err(PairingError::SameConnection(a.connection_id));
        }
        if a.email == b.email {
            return Err(PairingError::SameEmail(a.email));
        }
        for member in [&a, &b] {
            if self.index.contains_key(&member.connection_id) {
                return Err(PairingError::AlreadyPaired(member.connection_id));
            }
        }

        self.next_id = self.next_id.wrapping_add(1);
        let id = PairingId::from_raw(self.next_id);

        self.index.insert(a.connection_id, id);
        self.index.insert(b.connection_id, id);
        self.pairings.insert(
            id,
            Pairing {
                id,
                member_a: a,
                member_b: b,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    /// Returns the pairing `connection_id` belongs to.
    #[must_use]
    pub fn pairing_of(&self, connection_id: ConnectionId) -> Option<&Pairing> {
        let id = self.index.get(&connection_id)?;
        self.pairings.get(id)
    }

    /// Returns the pairing with the given id.
    #[must_use]
    pub fn get(&self, id: PairingId) -> Option<&Pairing> {
        self.pairings.get(&id)
    }

    /// Returns `true` if `connection_id` is indexed.
    #[must_use]
    pub fn is_paired(&self, connection_id: ConnectionId) -> bool {
        self.index.contains_key(&connection_id)
    }

    /// Removes the pairing `connection_id` belongs to, together with both
    /// index entries, and returns it.
    ///
    /// An index entry pointing at a missing pairing is dropped and `None` is
    /// returned.
    pub fn remove_for(&mut self, connection_id: ConnectionId) -> Option<Pairing> {
        let id = *self.index.get(&connection_id)?;
        let Some(pairing) = self.pairings.remove(&id) else {
            self.index.remove(&connection_id);
            return None;
        };
        for member in pairing.members() {
            self.index.remove(&member.connection_id);
        }
        Some(pairing)
    }

    /// Iterates over all active pairings in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.values()
    }

    /// Number of active pairings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    /// Returns `true` if no pairing is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    /// Number of indexed connections.
    #[must_use]
    pub fn indexed_len(&self) -> usize {
        self.index.len()
    }
}
