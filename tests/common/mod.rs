//! Shared harness: boots the real router on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use meet_broker::app_state::AppState;
use meet_broker::config::BrokerConfig;
use meet_broker::domain::{EmailDomain, PollingLobby};
use meet_broker::router::build_app;
use meet_broker::service::{Broker, BrokerService};

/// A connected test client.
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Starts a server on `127.0.0.1:0` and returns its address.
pub async fn spawn_server() -> SocketAddr {
    let config = BrokerConfig::from_lookup(|key| {
        (key == "LISTEN_ADDR").then(|| "127.0.0.1:0".to_string())
    })
    .expect("test config");
    let domain = EmailDomain::new(&config.allowed_email_domain).expect("domain");
    let state = AppState {
        broker: Arc::new(BrokerService::new(Broker::new(domain.clone()))),
        lobby: Arc::new(PollingLobby::new(domain)),
        outbound_buffer: config.outbound_buffer,
    };
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Opens a WebSocket to `/ws`.
pub async fn connect(addr: SocketAddr) -> WsClient {
    let (client, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("ws connect");
    client
}

/// Sends one `{event, data}` frame.
pub async fn send(client: &mut WsClient, frame: Value) {
    client
        .send(Message::text(frame.to_string()))
        .await
        .expect("ws send");
}

/// Waits for the next text frame and decodes it.
pub async fn next_event(client: &mut WsClient) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("timed out waiting for an event")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("json frame");
        }
    }
}

/// Asserts that no text frame arrives within a short grace period.
pub async fn assert_silent(client: &mut WsClient) {
    let next = tokio::time::timeout(Duration::from_millis(200), client.next()).await;
    if let Ok(Some(Ok(Message::Text(text)))) = next {
        panic!("unexpected event: {text}");
    }
}

/// Connects and joins with `email`, returning the client and its user id.
pub async fn join(addr: SocketAddr, email: &str) -> (WsClient, String) {
    let mut client = connect(addr).await;
    send(&mut client, serde_json::json!({ "event": "join", "data": { "email": email } })).await;
    let event = next_event(&mut client).await;
    assert_eq!(event["event"], "joinSuccess", "{event}");
    let user_id = event["data"]["userId"].as_str().expect("userId").to_string();
    (client, user_id)
}

/// Fetches `/api/stats`.
pub async fn stats(addr: SocketAddr) -> Value {
    reqwest::get(format!("http://{addr}/api/stats"))
        .await
        .expect("stats request")
        .json()
        .await
        .expect("stats body")
}

/// Polls `/api/stats` until `check` holds.
pub async fn wait_for_stats(addr: SocketAddr, check: impl Fn(&Value) -> bool) -> Value {
    for _ in 0..50 {
        let current = stats(addr).await;
        if check(&current) {
            return current;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("stats never reached the expected state: {}", stats(addr).await);
}
