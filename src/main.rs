//! Catalog Cache - A client-resident product catalog cache
//!
//! Serves the product catalog over HTTP to presentation code, backed by a
//! remote "list all products" endpoint.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_cache::api::create_router;
use catalog_cache::catalog::{HttpCatalogSource, SystemClock};
use catalog_cache::{AppState, CatalogCache, Config, RefreshScheduler, VisibilityHandle};

/// Main entry point for the catalog cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the remote catalog source and the cache
/// 4. Start background refresh task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Catalog Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: catalog_url={}, expiry_window={}s, refresh_interval={}s, port={}",
        config.catalog_url,
        config.expiry_window_secs,
        config.refresh_interval_secs,
        config.server_port
    );

    let source = HttpCatalogSource::new(config.catalog_url.clone(), config.request_timeout())
        .context("failed to build catalog HTTP client")?;
    let cache = CatalogCache::from_config(&config, Arc::new(source), Arc::new(SystemClock));
    let visibility = VisibilityHandle::default();
    info!("Catalog cache initialized");

    let mut scheduler =
        RefreshScheduler::new(cache.clone(), visibility.clone(), config.refresh_interval());
    scheduler.start();

    let app = create_router(AppState::new(cache, visibility));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    scheduler.stop();
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
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
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
}
