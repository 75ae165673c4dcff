//! HTTP server implementation using Axum.

use crate::handler::{handle_health, handle_rpc};
use appdock_library::{IconCache, LauncherRegistry};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    /// Launcher registry over the descriptor directory
    pub registry: LauncherRegistry,
    /// Prefetched icon asset cache
    pub icon_cache: IconCache,
}

/// Start the JSON-RPC HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    registry: LauncherRegistry,
    icon_cache: IconCache,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let state = Arc::new(AppState {
        registry,
        icon_cache,
    });

    // Configure CORS for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/rpc", post(handle_rpc))
        .layer(cors)
        .with_state(state);

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Bind to the address
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server error");
    });

    Ok(actual_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_server_starts() {
        let temp_dir = TempDir::new().unwrap();
        let registry = LauncherRegistry::with_apps_dir(temp_dir.path().join("applications"));
        let icon_cache = IconCache::new(temp_dir.path().join("icons")).unwrap();

        let addr = start_server(registry, icon_cache, "127.0.0.1", 0)
            .await
            .unwrap();
        assert!(addr.port() > 0);
    }
}
