use std::collections::BTreeMap;

use axum::{extract::State, Json};
use models::api::MobileConfig;

use super::ServerState;

/// Bootstrap document fetched by the app before anything else.
#[utoipa::path(get, path = "/mobile/config", tag = "mobile", responses((status = 200, description = "Client configuration")))]
pub async fn mobile_config(State(state): State<ServerState>) -> Json<MobileConfig> {
    let cfg = &state.mobile;
    Json(MobileConfig {
        uisp_base_url: cfg.uisp_base_url.clone(),
        api_base_url: cfg.api_base_url.clone(),
        feature_flags: BTreeMap::from([("native_api".to_string(), true)]),
        push_register: cfg.push_register_url(),
        environment: cfg.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        banner: cfg.banner.clone(),
    })
}
