//! An active two-party session.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{ConnectionId, Identity};

/// Opaque pairing key issued by [`super::PairingTable`].
///
/// A plain counter; it never encodes the member connection ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairingId(u64);

impl PairingId {
    /// Wraps a raw counter value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pairing-{}", self.0)
    }
}

/// Two matched identities. Semantically unordered.
#[derive(Debug, Clone)]
pub struct Pairing {
    /// Key in the pairing table.
    pub id: PairingId,
    /// The member whose request created the pairing.
    pub member_a: Identity,
    /// The member picked from the waiting pool.
    pub member_b: Identity,
    /// When the pairing was formed.
    pub created_at: DateTime<Utc>,
}

impl Pairing {
    /// Returns `true` if `connection_id` is one of the two members.
    #[must_use]
    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.member_a.connection_id == connection_id || self.member_b.connection_id == connection_id
    }

    /// Returns the other member, or `None` if `connection_id` is not a member.
    #[must_use]
    pub fn partner_of(&self, connection_id: ConnectionId) -> Option<&Identity> {
        if self.member_a.connection_id == connection_id {
            Some(&self.member_b)
        } else if self.member_b.connection_id == connection_id {
            Some(&self.member_a)
        } else {
            None
        }
    }

    /// Both members, `member_a` first.
    #[must_use]
    pub fn members(&self) -> [&Identity; 2] {
        [&self.member_a, &self.member_b]
    }
}
