//! Session-establishment message kinds the relay forwards.

use std::fmt;

use super::{ConnectionId, ServerEvent};

/// The three opaque signaling message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SDP offer.
    Offer,
    /// SDP answer.
    Answer,
    /// ICE candidate.
    IceCandidate,
}

impl SignalKind {
    /// Wraps `payload` into the event delivered to the target, tagged with
    /// the sender.
    #[must_use]
    pub fn into_event(self, from: ConnectionId, payload: serde_json::Value) -> ServerEvent {
        match self {
            Self::Offer => ServerEvent::Offer { from, sdp: payload },
            Self::Answer => ServerEvent::Answer { from, sdp: payload },
            Self::IceCandidate => ServerEvent::IceCandidate {
                from,
                candidate: payload,
            },
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        })
    }
}
