//! meet-broker server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use meet_broker::app_state::AppState;
use meet_broker::config::{BrokerConfig, LogFormat};
use meet_broker::domain::{EmailDomain, PollingLobby};
use meet_broker::router::build_app;
use meet_broker::service::{Broker, BrokerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BrokerConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(
        addr = %config.listen_addr,
        domain = %config.allowed_email_domain,
        "starting meet-broker"
    );

    // Build domain and service layer
    let domain = EmailDomain::new(&config.allowed_email_domain)
        .context("compiling email domain pattern")?;
    let broker = Arc::new(BrokerService::new(Broker::new(domain.clone())));
    let lobby = Arc::new(PollingLobby::new(domain));

    // Build application state
    let app_state = AppState {
        broker: Arc::clone(&broker),
        lobby,
        outbound_buffer: config.outbound_buffer,
    };
    let app = build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    let stats = broker.stats().await;
    tracing::info!(
        waiting_users = stats.waiting_users,
        active_pairings = stats.active_pairings,
        total_users = stats.total_users,
        "server stopped"
    );

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
