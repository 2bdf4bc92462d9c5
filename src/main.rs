//! Expiring Cache - HTTP front-end for a bounded, expiring cache
//!
//! Run with `--self-check` to exercise a small cache and exit instead of
//! serving.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiring_cache::api::{create_router, AppState};
use expiring_cache::{run_self_check, spawn_purge_task, Config, ExpiringCache};

/// Cache size and TTL used by `--self-check`.
const SELF_CHECK_CAPACITY: usize = 5;
const SELF_CHECK_TTL: Duration = Duration::from_millis(10);

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache with the configured capacity and TTL
/// 4. Start the background purge task if enabled
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expiring_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().skip(1).any(|arg| arg == "--self-check") {
        return tokio::task::spawn_blocking(|| run_self_check(SELF_CHECK_CAPACITY, SELF_CHECK_TTL))
            .await
            .context("self check task failed")?;
    }

    info!("Starting Expiring Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, ttl={}ms, port={}, purge_interval={}ms",
        config.max_entries, config.ttl_ms, config.server_port, config.purge_interval_ms
    );

    let cache = ExpiringCache::from_config(&config).context("invalid cache configuration")?;
    let state = AppState::new(cache);

    let purge_handle = config
        .purge_interval()
        .map(|interval| spawn_purge_task(state.cache.clone(), interval));
    if purge_handle.is_none() {
        info!("Background purge disabled, expired entries are removed on read");
    }

    let app = create_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(purge_handle))
        .await
        .context("server error")?;

    state.cache.close();
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the purge task and allows graceful shutdown.
async fn shutdown_signal(purge_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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

    if let Some(handle) = purge_handle {
        handle.abort();
        warn!("Purge task aborted");
    }
}
