//! Events the broker sends to a connection.
//!
//! Serialized as `{"event": "<name>", "data": {...}}`. Events without a
//! payload omit `data`.

use serde::Serialize;

use super::{ConnectionId, PublicIdentity};

/// Broker → client event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Admission succeeded.
    JoinSuccess {
        /// The connection id the participant is known by.
        #[serde(rename = "userId")]
        user_id: ConnectionId,
    },

    /// Admission was rejected.
    JoinError {
        /// Human-readable reason.
        message: String,
    },

    /// A partner was found.
    Matched {
        /// The partner's public identity.
        user: PublicIdentity,
    },

    /// Relayed SDP offer.
    Offer {
        /// Sender connection id.
        from: ConnectionId,
        /// Opaque session description.
        sdp: serde_json::Value,
    },

    /// Relayed SDP answer.
    Answer {
        /// Sender connection id.
        from: ConnectionId,
        /// Opaque session description.
        sdp: serde_json::Value,
    },

    /// Relayed ICE candidate.
    #[serde(rename = "ice-candidate")]
    IceCandidate {
        /// Sender connection id.
        from: ConnectionId,
        /// Opaque candidate.
        candidate: serde_json::Value,
    },

    /// The pairing this connection belonged to has ended.
    PartnerDisconnected,

    /// The client sent a frame the broker could not interpret.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl ServerEvent {
    /// Returns the wire event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinSuccess { .. } => "joinSuccess",
            Self::JoinError { .. } => "joinError",
            Self::Matched { .. } => "matched",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
            Self::PartnerDisconnected => "partnerDisconnected",
            Self::Error { .. } => "error",
        }
    }
}
