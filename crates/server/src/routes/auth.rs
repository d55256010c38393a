use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use chrono::{Duration, Utc};
use models::api::{LoginRequest, TokenResponse};
use service::RecordStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ApiError;

/// Lifetime advertised for issued access tokens.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug, Default)]
pub struct ServerAuthConfig {
    /// Bearer token required on data routes; `None` disables the check.
    pub api_token: Option<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<RecordStore>,
    pub auth: ServerAuthConfig,
    pub mobile: Arc<configs::MobileConfig>,
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequestDoc, responses((status = 200, description = "Logged in", body = crate::openapi::TokenResponseDoc), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(input) = payload.map_err(|e| {
        warn!(error = %e, "login body rejected");
        ApiError::invalid_body()
    })?;

    if !state.store.validate_user(&input.username, &input.password) {
        warn!(username = %input.username, "login rejected");
        return Err(ApiError::unauthorized("invalid_credentials", "Invalid username or password"));
    }

    // 未配置 API_TOKEN 时数据接口不校验，这里仅返回一次性标识
    let access_token = state
        .auth
        .api_token
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let expires_at = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp_millis();
    info!(username = %input.username, "login accepted");
    Ok(Json(TokenResponse { access_token, expires_at }))
}

/// Middleware: require `Authorization: Bearer <token>` when a token is configured.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.auth.api_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);

    if !authorized {
        warn!(path = %req.uri().path(), "missing or invalid bearer token");
        return Err(ApiError::unauthorized("unauthorized", "Invalid or missing token"));
    }
    Ok(next.run(req).await)
}
