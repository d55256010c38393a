use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use models::{api::PushRegisterResponse, errors::ModelError, PushRegistration};
use tracing::{info, warn};
use uuid::Uuid;

use super::ServerState;
use crate::errors::ApiError;

#[utoipa::path(post, path = "/push/register", tag = "push", request_body = crate::openapi::PushRegisterRequestDoc, responses((status = 200, description = "Registered"), (status = 400, description = "Invalid body or missing token")))]
pub async fn register_push(
    State(state): State<ServerState>,
    payload: Result<Json<PushRegistration>, JsonRejection>,
) -> Result<Json<PushRegisterResponse>, ApiError> {
    let Json(registration) = payload.map_err(|e| {
        warn!(error = %e, "push body rejected");
        ApiError::invalid_body()
    })?;
    registration.validate().map_err(|e| match e {
        ModelError::Validation(msg) => ApiError::new(StatusCode::BAD_REQUEST, "missing_token", msg),
    })?;

    let request_id = Uuid::new_v4().to_string();
    info!(
        platform = %registration.platform,
        app_version = %registration.app_version,
        locale = %registration.locale,
        %request_id,
        "push token registered"
    );

    let store = state.store.clone();
    tokio::task::spawn_blocking(move || store.register_push(registration))
        .await
        .map_err(|e| ApiError::internal(format!("push task failed: {e}")))?;

    Ok(Json(PushRegisterResponse { request_id, message: "registered".into() }))
}
