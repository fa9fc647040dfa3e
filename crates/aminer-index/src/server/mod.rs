//! HTTP query server.

mod routes;

use std::net::SocketAddr;
use std::time::Duration;

pub use routes::{ApiError, create_router};

use crate::query::QueryService;

/// Serve queries over HTTP until Ctrl-C.
///
/// With the profile cache enabled, the manifest is polled every
/// `cache_sync_interval` and the cache dropped when it changes.
///
/// # Errors
///
/// Returns error if the port cannot be bound or the server fails.
pub async fn run_http(
    service: QueryService,
    port: u16,
    cache_sync_interval: Duration,
) -> anyhow::Result<()> {
    if service.cache_enabled() {
        tokio::spawn(watch_manifest(service.clone(), cache_sync_interval));
    }

    let router = create_router(service);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("HTTP server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn watch_manifest(service: QueryService, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if let Err(e) = service.sync_cache().await {
            tracing::warn!(error = %e, "Manifest check failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
