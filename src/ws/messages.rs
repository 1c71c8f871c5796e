//! Client → broker WebSocket events.
//!
//! Frames are JSON text of the form `{"event": "<name>", "data": {...}}`.
//! Broker → client events are [`crate::domain::ServerEvent`].

use serde::Deserialize;

/// Event sent by a client over the persistent channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Request admission under `email`.
    Join {
        /// Email to validate against the admission domain.
        email: String,
    },

    /// Ask to be matched with a waiting participant.
    FindPartner,

    /// SDP offer for `to`.
    Offer {
        /// Target connection id.
        to: String,
        /// Opaque session description.
        sdp: serde_json::Value,
    },

    /// SDP answer for `to`.
    Answer {
        /// Target connection id.
        to: String,
        /// Opaque session description.
        sdp: serde_json::Value,
    },

    /// ICE candidate for `to`.
    #[serde(rename = "ice-candidate")]
    IceCandidate {
        /// Target connection id.
        to: String,
        /// Opaque candidate.
        candidate: serde_json::Value,
    },

    /// Leave the current pairing.
    EndChat,

    /// Report another participant, ending their pairing.
    Report {
        /// Reported connection id.
        #[serde(rename = "userId")]
        user_id: String,
        /// Free-form reason; logged only.
        #[serde(default)]
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ClientEvent {
        let Ok(event) = serde_json::from_value(value) else {
            panic!("event should parse");
        };
        event
    }

    #[test]
    fn parses_join() {
        assert_eq!(
            parse(json!({ "event": "join", "data": { "email": "a@vitbhopal.ac.in" } })),
            ClientEvent::Join {
                email: "a@vitbhopal.ac.in".to_string()
            }
        );
    }

    #[test]
    fn parses_payloadless_events() {
        assert_eq!(parse(json!({ "event": "findPartner" })), ClientEvent::FindPartner);
        assert_eq!(parse(json!({ "event": "endChat" })), ClientEvent::EndChat);
    }

    #[test]
    fn parses_ice_candidate() {
        let event = parse(json!({
            "event": "ice-candidate",
            "data": { "to": "peer", "candidate": { "sdpMid": "0" } }
        }));
        assert_eq!(
            event,
            ClientEvent::IceCandidate {
                to: "peer".to_string(),
                candidate: json!({ "sdpMid": "0" })
            }
        );
    }

    #[test]
    fn report_reason_is_optional() {
        assert_eq!(
            parse(json!({ "event": "report", "data": { "userId": "x" } })),
            ClientEvent::Report {
                user_id: "x".to_string(),
                reason: String::new()
            }
        );
    }

    #[test]
    fn rejects_unknown_event() {
        let result = serde_json::from_value::<ClientEvent>(json!({ "event": "teleport" }));
        assert!(result.is_err());
    }
}
