use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::{runtime, storage::FsDocumentStore, DocumentStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Open the store named by `cfg` and wire it into the router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let depth = cfg.storage.max_json_depth;
    let store: Arc<dyn DocumentStore> =
        FsDocumentStore::with_max_depth(&cfg.storage.root, depth).await?;
    runtime::check_store_dir(&cfg.storage.root).await?;
    let state = AppState::new(store).with_max_json_depth(depth);
    Ok(routes::build_router(state, build_cors(), cfg.server.max_body_bytes))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, draining connections");
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(anyhow::anyhow!("bind {addr}: {e}")))?;
    info!(%addr, root = %cfg.storage.root.display(), "document store listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
