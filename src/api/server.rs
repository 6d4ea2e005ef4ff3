use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{decompression::RequestDecompressionLayer, trace::TraceLayer};
use tracing::{error, info};

use super::{
    services::{get_topic, handle_command, health},
    state::AppState,
};
use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::ledger::Ledger;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the application router over prepared state
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/commands", post(handle_command))
        .route("/operators/topics/{name}", get(get_topic))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        // Decompress gzip request bodies before extractors see them
        .layer(RequestDecompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Open the configured store and serve until a shutdown signal arrives
pub async fn run(config: Config) -> Result<(), AnyError> {
    config
        .commands
        .require_token()
        .map_err(|e| format!("Refusing to start: {e}"))?;

    info!(backend = ?config.storage.backend, path = %config.storage.data_path.display(), "Opening topic store");
    let ledger = Ledger::open(&config.storage)
        .map_err(|e| format!("Failed to open topic store: {e}"))?;

    let address = config.server.bind_addr;
    let state = AppState::new(config, CommandRegistry::with_defaults(), ledger.clone());
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "pointsboard listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ledger
        .flush()
        .await
        .map_err(|e| format!("Failed to flush topic store: {e}"))?;
    info!("Topic store flushed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
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
