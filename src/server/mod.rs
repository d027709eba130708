//! HTTP layer: a thin axum CRUD surface over the validation engine
//!
//! Handlers authenticate the bearer token, run the validation engine
//! through the [`Validated`](crate::core::validation::Validated) extractor,
//! apply the resource's payload transform, and hand the result to the
//! record store.

pub mod auth;
pub mod resources;
pub mod router;
pub mod seed;
pub mod state;
pub mod token;
pub mod transforms;

pub use resources::{ResourceDescriptor, ResourceState};
pub use router::{build_router, build_router_with};
pub use state::AppState;
pub use token::TokenIssuer;

use crate::config::AppConfig;
use crate::core::store::RecordStore;
use crate::schemas::SchemaRegistry;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Assemble the application state from configuration and a store
pub fn app_state(config: &AppConfig, store: Arc<dyn RecordStore>) -> AppState {
    AppState::new(
        store,
        SchemaRegistry::standard(),
        TokenIssuer::new(&config.token_secret, config.token_expiry_days),
    )
}

/// Serve the API with graceful shutdown
pub async fn serve(config: &AppConfig, store: Arc<dyn RecordStore>) -> Result<()> {
    if config.seed_default_user {
        seed::seed_default_user(store.as_ref()).await?;
    }

    let app = build_router(app_state(config, store));
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(port = config.http_port, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
