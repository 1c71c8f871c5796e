//! Admitted participant identity.

use serde::{Deserialize, Serialize};

use super::ConnectionId;

/// A connection that passed admission, paired with its validated email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The live connection this identity belongs to.
    pub connection_id: ConnectionId,
    /// Validated, domain-restricted email.
    pub email: String,
}

impl Identity {
    /// Creates an identity. Callers are expected to have validated `email`.
    #[must_use]
    pub fn new(connection_id: ConnectionId, email: impl Into<String>) -> Self {
        Self {
            connection_id,
            email: email.into(),
        }
    }

    /// The view of this identity that is shown to a partner.
    #[must_use]
    pub fn public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.connection_id,
            email: self.email.clone(),
        }
    }
}

/// Partner identity as carried by the `matched` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    /// Partner connection id, used as the `to` address for signaling.
    pub id: ConnectionId,
    /// Partner email.
    pub email: String,
}
