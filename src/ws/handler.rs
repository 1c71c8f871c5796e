//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to the signaling channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let broker = std::sync::Arc::clone(&state.broker);
    let outbound_buffer = state.outbound_buffer;

    ws.on_upgrade(move |socket| run_connection(socket, broker, outbound_buffer))
}
