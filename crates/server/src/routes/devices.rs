use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{Duration, Utc};
use models::api::{DeviceMetrics, DevicesResponse, MetricPoint};

use super::ServerState;

#[utoipa::path(get, path = "/devices", tag = "devices", responses((status = 200, description = "Device list with refresh time"), (status = 401, description = "Unauthorized")))]
pub async fn list_devices(State(state): State<ServerState>) -> Json<DevicesResponse> {
    Json(DevicesResponse {
        last_updated: Utc::now().timestamp_millis(),
        devices: state.store.list_devices(),
    })
}

/// Placeholder series until a metrics source is wired in.
#[utoipa::path(get, path = "/metrics/devices/{id}", tag = "devices", params(("id" = String, Path, description = "Device id")), responses((status = 200, description = "Recent samples")))]
pub async fn device_metrics(Path(id): Path<String>) -> Json<DeviceMetrics> {
    let now = Utc::now();
    let points = vec![
        MetricPoint {
            timestamp: (now - Duration::minutes(5)).timestamp(),
            latency: 5.0,
            cpu: 20.0,
            ram: 30.0,
            online: true,
        },
        MetricPoint { timestamp: now.timestamp(), latency: 8.0, cpu: 22.0, ram: 31.0, online: true },
    ];
    Json(DeviceMetrics { device_id: id, points })
}
