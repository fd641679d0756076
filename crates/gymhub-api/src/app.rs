//! Application builder: wires infrastructure, services and the router, then serves.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tracing::{info, warn};

use gymhub_auth::identity::build_identity_provider;
use gymhub_auth::jwt::build_verifier;
use gymhub_core::config::AppConfig;
use gymhub_core::error::AppError;
use gymhub_core::traits::SystemClock;
use gymhub_database::build_store;
use gymhub_service::TracingObserver;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Assembles `AppState` from configuration using the production adapters.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    info!(backend = config.database.backend.as_str(), "Initializing document store");
    let store = build_store(&config.database).await?;

    info!(mode = ?config.identity.mode, "Initializing identity provider");
    let verifier = build_verifier(&config.identity, &config.auth)?;
    let identity = build_identity_provider(&config.identity)?;

    Ok(AppState::new(
        config,
        store,
        verifier,
        identity,
        Arc::new(SystemClock),
        Arc::new(TracingObserver),
    ))
}

/// Runs the GymHub server with the given configuration.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting GymHub server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "GymHub server listening");

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out; dropping open connections");
        }
    }

    info!("GymHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
