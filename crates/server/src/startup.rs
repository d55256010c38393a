use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::{observability, RecordStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerAuthConfig, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the record store and assemble the shared handler state.
pub fn build_state(cfg: &AppConfig) -> ServerState {
    let store = RecordStore::open(cfg.store.path.as_deref());
    ServerState {
        store,
        auth: ServerAuthConfig { api_token: cfg.auth.api_token.clone() },
        mobile: Arc::new(cfg.mobile.clone()),
    }
}

/// Build the router for an already-assembled state.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Run the HTTP server with a configuration loaded by the caller.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    observability::init();

    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))?;

    let state = build_state(&cfg);
    info!(
        store_path = ?state.store.path(),
        auth_enabled = state.auth.api_token.is_some(),
        environment = %cfg.mobile.environment,
        "record store ready"
    );
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, "API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
