//! # hubsetupd — hub setup wizard daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Construct the hub and geocoder clients (adapters)
//! - Construct the session store and application services via `AppState`
//! - Build the axum router, bind to a TCP port and serve
//! - Prune idle wizard sessions in the background
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use hubsetup_adapter_http_axum::router;
use hubsetup_adapter_http_axum::state::AppState;
use hubsetup_adapter_hub_http::{HubHttpClient, NominatimGeocoder};
use hubsetup_app::ports::SessionStore;
use hubsetup_app::session_store::InMemorySessionStore;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Adapters
    let hub = HubHttpClient::new(config.hub_client()?)?;
    let geocoder = NominatimGeocoder::new(config.geocoder()?)?;
    let sessions = Arc::new(InMemorySessionStore::new());

    // Housekeeping
    let pruner = tokio::spawn(prune_sessions(
        Arc::clone(&sessions),
        config.prune_interval(),
        config.session_ttl(),
    ));

    // HTTP
    let state = AppState::new(hub, geocoder, sessions, config.wizard_settings());
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        addr = %bind_addr,
        hub = %config.hub.base_url,
        "hubsetupd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pruner.abort();
    tracing::info!("hubsetupd stopped");
    Ok(())
}

async fn prune_sessions<S>(sessions: Arc<S>, every: Duration, ttl: chrono::Duration)
where
    S: SessionStore + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match sessions.prune(Utc::now(), ttl).await {
            Ok(0) => {}
            Ok(pruned) => tracing::debug!(pruned, "expired wizard sessions pruned"),
            Err(err) => tracing::warn!(error = %err, "session pruning failed"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
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
                tracing::error!(error = %err, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received, draining connections");
}
