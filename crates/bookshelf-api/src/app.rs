//! Application builder: opens stores, wires state, and serves the router.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use bookshelf_cache::CacheManager;
use bookshelf_core::config::AppConfig;
use bookshelf_core::error::{AppError, ErrorKind};
use bookshelf_core::result::AppResult;
use bookshelf_database::Database;

use crate::router::build_router;
use crate::state::AppState;

/// Open the configured cache and stores and build the shared state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache).await?;

    info!(provider = %config.database.provider, "Opening database");
    let database = Database::open(&config.database).await?;

    AppState::new(config, cache, database)
}

/// Serve until `shutdown` resolves, drain in-flight requests for at most
/// `server.shutdown_grace_seconds`, then close the stores.
pub async fn serve(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> AppResult<()> {
    let address = state.config.server.bind_address();
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);

    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {address}"), e)
    })?;
    info!(address = %address, "Bookshelf listening");

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, build_router(state.clone())).with_graceful_shutdown(
        async move {
            shutdown.await;
            info!("Shutdown signal received, draining connections");
            let _ = stopping_tx.send(true);
        },
    );
    let mut server = tokio::spawn(server.into_future());

    let finished = tokio::select! {
        joined = &mut server => Some(joined),
        _ = stopping_rx.wait_for(|stopping| *stopping) => None,
    };

    let joined = match finished {
        Some(joined) => joined,
        None => match tokio::time::timeout(grace, &mut server).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out, aborting");
                server.abort();
                Ok(Ok(()))
            }
        },
    };

    let served = joined
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server task failed", e))?
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e));

    info!("Server stopped, closing stores");
    state.database.close().await;
    served
}
