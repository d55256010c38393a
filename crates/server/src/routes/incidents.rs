use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use models::{api::AckRequest, Incident};
use tracing::{info, warn};

use super::ServerState;
use crate::errors::ApiError;

#[utoipa::path(get, path = "/incidents", tag = "incidents", responses((status = 200, description = "All incidents"), (status = 401, description = "Unauthorized")))]
pub async fn list_incidents(State(state): State<ServerState>) -> Json<Vec<Incident>> {
    Json(state.store.list_incidents())
}

/// Decode the acknowledgment body. An empty body means "use the default window".
fn parse_ack_body(body: &[u8]) -> Result<AckRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AckRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "ack body rejected");
        ApiError::invalid_body()
    })
}

#[utoipa::path(post, path = "/incidents/{id}/ack", tag = "incidents", params(("id" = String, Path, description = "Incident id")), request_body = crate::openapi::AckRequestDoc, responses((status = 200, description = "Acknowledged incident"), (status = 400, description = "Invalid body"), (status = 404, description = "Incident not found")))]
pub async fn acknowledge_incident(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Incident>, ApiError> {
    let duration = parse_ack_body(&body)?.duration();

    // 写操作在锁内同步落盘，放到阻塞线程池执行
    let store = state.store.clone();
    let target = id.clone();
    let updated = tokio::task::spawn_blocking(move || store.acknowledge_incident(&target, duration))
        .await
        .map_err(|e| ApiError::internal(format!("ack task failed: {e}")))?;

    match updated {
        Some(incident) => {
            info!(incident = %incident.id, minutes = duration.minutes(), ack_until = ?incident.ack_until, "incident acknowledged");
            Ok(Json(incident))
        }
        None => Err(ApiError::not_found("Incident not found")),
    }
}
