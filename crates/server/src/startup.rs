use std::{future::Future, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes::{self, AppState};
use service::CharacterStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the seed file into a fresh store.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let store = CharacterStore::load(&cfg.seed.path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load seed data from {}: {e}", cfg.seed.path))?;
    Ok(AppState::new(store as Arc<dyn service::CharacterRepository>))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Public entry: load seed data, bind, and serve until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind {addr}: {e}"))?;
    info!(addr = %listener.local_addr()?, "marvel api listening");

    serve(listener, app, shutdown_signal()).await
}
