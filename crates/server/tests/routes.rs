use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use service::RecordStore;
use tower::Service;

use server::routes::{ServerAuthConfig, ServerState};
use server::startup::build_app;

const TOKEN: &str = "test-token";

fn app_with(token: Option<&str>) -> (Router, Arc<RecordStore>) {
    let store = RecordStore::in_memory();
    let state = ServerState {
        store: Arc::clone(&store),
        auth: ServerAuthConfig { api_token: token.map(str::to_string) },
        mobile: Arc::new(configs::MobileConfig::default()),
    };
    (build_app(state), store)
}

fn get(uri: &str, token: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut b = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        b = b.header("authorization", format!("Bearer {t}"));
    }
    Ok(b.body(Body::empty())?)
}

fn post(uri: &str, token: Option<&str>, body: impl Into<Body>) -> anyhow::Result<Request<Body>> {
    let mut b = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(t) = token {
        b = b.header("authorization", format!("Bearer {t}"));
    }
    Ok(b.body(body.into())?)
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));
    let (status, body) = send(&app, get("/health", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn data_routes_require_bearer_token() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));

    let (status, body) = send(&app, get("/devices", None)?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(&app, get("/incidents", Some("wrong"))?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, get("/devices", Some(TOKEN))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"].as_array().map(Vec::len), Some(3));
    assert!(body["last_updated"].as_i64().is_some());
    Ok(())
}

#[tokio::test]
async fn no_configured_token_means_open_routes() -> anyhow::Result<()> {
    let (app, _) = app_with(None);
    let (status, body) = send(&app, get("/incidents", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "inc-1");
    Ok(())
}

#[tokio::test]
async fn ack_found_and_not_found() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));

    let before = Utc::now();
    let (status, body) = send(
        &app,
        post("/incidents/inc-1/ack", Some(TOKEN), json!({"duration_minutes": 0}).to_string())?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "inc-1");
    let until = body["ack_until"].as_str().expect("ack_until string");
    let until = DateTime::parse_from_rfc3339(until)?.with_timezone(&Utc);
    assert!(until >= before + Duration::minutes(30) - Duration::seconds(1));
    assert!(until <= Utc::now() + Duration::minutes(30));

    let (status, body) = send(
        &app,
        post("/incidents/inc-2/ack", Some(TOKEN), json!({"duration_minutes": 30}).to_string())?,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "Incident not found");

    let (_, list) = send(&app, get("/incidents", Some(TOKEN))?).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn ack_body_handling() -> anyhow::Result<()> {
    let (app, _) = app_with(None);

    let (status, body) = send(&app, post("/incidents/inc-1/ack", None, Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["ack_until"].is_string());

    let (status, body) = send(&app, post("/incidents/inc-1/ack", None, "not json")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_body");
    Ok(())
}

#[tokio::test]
async fn push_register_validation_and_append() -> anyhow::Result<()> {
    let (app, store) = app_with(Some(TOKEN));
    let reg = json!({"token": "fcm-abc", "platform": "android", "app_version": "1.0.0", "locale": "en-US"});

    let (status, body) = send(&app, post("/push/register", None, json!({"token": "", "platform": "android"}).to_string())?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "missing_token");
    assert_eq!(body["message"], "token is required");

    let (status, body) = send(&app, post("/push/register", None, "{")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_body");

    for _ in 0..2 {
        let (status, body) = send(&app, post("/push/register", None, reg.to_string())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "registered");
        assert!(body["request_id"].as_str().is_some_and(|s| !s.is_empty()));
    }
    let log = store.push_registrations();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], log[1]);
    assert_eq!(log[0].token, "fcm-abc");
    Ok(())
}

#[tokio::test]
async fn login_checks_seed_credentials() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));

    let (status, body) = send(&app, post("/auth/login", None, json!({"username": "admin", "password": "admin"}).to_string())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], TOKEN);
    assert!(body["expires_at"].as_i64().is_some_and(|t| t > Utc::now().timestamp_millis()));

    let (status, body) = send(&app, post("/auth/login", None, json!({"username": "admin", "password": "nope"}).to_string())?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "invalid_credentials");
    Ok(())
}

#[tokio::test]
async fn mobile_config_and_prefixed_routes() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));

    let (status, body) = send(&app, get("/mobile/config", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["push_register_url"], "http://localhost:8080/push/register");
    assert_eq!(body["feature_flags"]["native_api"], true);
    assert_eq!(body["environment"], "dev");

    let (status, body) = send(&app, get("/nms/api/v2.1/mobile/config", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["banner"], "Demo backend");

    let (status, _) = send(&app, get("/nms/api/v2.1/incidents", None)?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, get("/nms/api/v2.1/incidents", Some(TOKEN))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["device_id"], "ap-1");
    Ok(())
}

#[tokio::test]
async fn device_metrics_placeholder() -> anyhow::Result<()> {
    let (app, _) = app_with(None);
    let (status, body) = send(&app, get("/metrics/devices/gw-1", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["device_id"], "gw-1");
    assert_eq!(body["points"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn prometheus_and_openapi_endpoints() -> anyhow::Result<()> {
    let (app, _) = app_with(Some(TOKEN));

    let resp = app.clone().call(get("/metrics", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    assert!(text.contains("noc_store_persist_failures_total"));

    let (status, body) = send(&app, get("/api-docs/openapi.json", None)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/incidents/{id}/ack"].is_object());
    Ok(())
}
