use axum::{
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::observability;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod devices;
pub mod incidents;
pub mod mobile;
pub mod push;

pub use auth::{ServerAuthConfig, ServerState};

/// Path prefix the mobile client puts in front of every API call.
pub const MOBILE_API_PREFIX: &str = "/nms/api/v2.1";

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Prometheus text exposition of the default registry.
pub async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let text = observability::gather_text().map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Routes shared by the root mount and the mobile prefix.
fn api_routes(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/mobile/config", get(mobile::mobile_config))
        .route("/push/register", post(push::register_push))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/devices", get(devices::list_devices))
        .route("/incidents", get(incidents::list_incidents))
        .route("/incidents/:id/ack", post(incidents::acknowledge_incident))
        .route("/metrics/devices/:id", get(devices::device_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ));

    public.merge(protected)
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = api_routes(&state);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(api.clone())
        .nest(MOBILE_API_PREFIX, api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
