//! Insertion-ordered pool of identities seeking a partner.

use super::{ConnectionId, Identity};

/// Ordered sequence of waiting identities.
///
/// Insertion order is the scan order used by the matchmaker. A connection id
/// appears at most once.
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: Vec<Identity>,
}

impl WaitingPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `identity` at the end of the pool.
    ///
    /// Returns `false` (and leaves the pool untouched) if the connection is
    /// already waiting.
    pub fn push_back(&mut self, identity: Identity) -> bool {
        if self.contains(identity.connection_id) {
            return false;
        }
        self.entries.push(identity);
        true
    }

    /// Removes the entry for `connection_id`, preserving the order of the rest.
    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Identity> {
        let pos = self
            .entries
            .iter()
            .position(|i| i.connection_id == connection_id)?;
        Some(self.entries.remove(pos))
    }

    /// Returns `true` if `connection_id` is waiting.
    #[must_use]
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.entries.iter().any(|i| i.connection_id == connection_id)
    }

    /// Returns the waiting identity for `connection_id`.
    #[must_use]
    pub fn get(&self, connection_id: ConnectionId) -> Option<&Identity> {
        self.entries.iter().find(|i| i.connection_id == connection_id)
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.entries.iter()
    }

    /// Number of waiting identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
