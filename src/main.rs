//! Relief Cache - HTTP server entry point
//!
//! Wires the configured store, the cache manager, the background sweep and
//! the Axum router together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relief_cache::api::create_router;
use relief_cache::cache::{CacheManager, CacheStore, FileStore, MemoryStore};
use relief_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the relief cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the backing store (file-backed when `CACHE_STORE_PATH` is set)
/// 4. Start the background sweep task
/// 5. Serve the router until SIGINT/SIGTERM, then stop the sweep
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relief_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting relief cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, sweep_interval={}s, port={}, producer_timeout={:?}",
        config.default_ttl, config.sweep_interval, config.server_port, config.producer_timeout
    );

    let store: Arc<dyn CacheStore> = match &config.store_path {
        Some(path) => {
            let store = FileStore::open(path)
                .await
                .with_context(|| format!("failed to open cache store at {}", path.display()))?;
            info!("File store opened at {}", path.display());
            Arc::new(store)
        }
        None => {
            info!("Using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let cache = Arc::new(CacheManager::new(store, config.default_ttl));
    let state = AppState::new(cache.clone(), config.producer_timeout);

    let shutdown = CancellationToken::new();
    let sweep_handle = spawn_sweep_task(cache, config.sweep_period(), shutdown.clone());
    info!("Background sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("server error")?;

    // Covers the case where serve returned without a signal
    shutdown.cancel();
    if let Err(e) = sweep_handle.await {
        error!("Sweep task ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
}
