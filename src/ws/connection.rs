//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single participant: incoming frames
//! are decoded and dispatched to the broker, and events queued on the
//! connection's outbound channel are written back to the socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::messages::ClientEvent;
use crate::domain::{ConnectionId, ServerEvent, SignalKind};
use crate::service::BrokerService;

/// Runs the read/write loop for one connection until either side closes,
/// then raises the disconnect.
pub async fn run_connection(socket: WebSocket, broker: Arc<BrokerService>, outbound_buffer: usize) {
    let connection_id = ConnectionId::new();
    let (outbound_tx, mut outbound_rx) = mpsc::channel(outbound_buffer.max(1));
    broker.connect(connection_id, outbound_tx).await;
    tracing::debug!(%connection_id, "ws connection opened");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from the client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, connection_id, &broker).await;
                        if let Some(reply) = reply
                            && ws_tx.send(Message::text(reply)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Event queued by the broker
            event = outbound_rx.recv() => {
                let Some(event) = event else { break };
                let Ok(json) = serde_json::to_string(&event) else {
                    tracing::warn!(%connection_id, event = event.name(), "failed to encode event");
                    continue;
                };
                if ws_tx.send(Message::text(json)).await.is_err() {
                    break;
                }
            }
        }
    }

    broker.disconnect(connection_id).await;
    tracing::debug!(%connection_id, "ws connection closed");
}

/// Dispatches one text frame. Returns a direct reply for frames that could
/// not be decoded; all other responses travel through the outbound channel.
async fn handle_text_message(
    text: &str,
    connection_id: ConnectionId,
    broker: &BrokerService,
) -> Option<String> {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::debug!(%connection_id, %err, "malformed client event");
            let reply = ServerEvent::Error {
                message: format!("malformed event: {err}"),
            };
            return serde_json::to_string(&reply).ok();
        }
    };

    match event {
        ClientEvent::Join { email } => {
            let _ = broker.join(connection_id, &email).await;
        }
        ClientEvent::FindPartner => {
            let _ = broker.find_partner(connection_id).await;
        }
        ClientEvent::Offer { to, sdp } => {
            relay(broker, SignalKind::Offer, connection_id, &to, sdp).await;
        }
        ClientEvent::Answer { to, sdp } => {
            relay(broker, SignalKind::Answer, connection_id, &to, sdp).await;
        }
        ClientEvent::IceCandidate { to, candidate } => {
            relay(broker, SignalKind::IceCandidate, connection_id, &to, candidate).await;
        }
        ClientEvent::EndChat => {
            let _ = broker.end_chat(connection_id).await;
        }
        ClientEvent::Report { user_id, reason } => match user_id.parse::<ConnectionId>() {
            Ok(reported) => {
                let _ = broker.report(connection_id, reported, &reason).await;
            }
            Err(_) => tracing::debug!(%connection_id, %user_id, "report for unknown user ignored"),
        },
    }
    None
}

/// A target that is not a connection id can never be live, so it is
/// dropped like any other unreachable target.
async fn relay(
    broker: &BrokerService,
    kind: SignalKind,
    sender: ConnectionId,
    to: &str,
    payload: serde_json::Value,
) {
    match to.parse::<ConnectionId>() {
        Ok(target) => {
            broker.relay(kind, sender, target, payload).await;
        }
        Err(_) => tracing::debug!(%kind, %sender, to, "relay target is not a connection id"),
    }
}
