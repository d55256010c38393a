use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
}

#[derive(ToSchema)]
pub struct LoginRequestDoc {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct TokenResponseDoc {
    pub access_token: String,
    pub expires_at: i64,
}

#[derive(ToSchema)]
pub struct AckRequestDoc {
    /// Minutes; zero, negative or missing means 30.
    pub duration_minutes: Option<i64>,
}

#[derive(ToSchema)]
pub struct PushRegisterRequestDoc {
    pub token: String,
    pub platform: String,
    pub app_version: String,
    pub locale: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::mobile::mobile_config,
        crate::routes::devices::list_devices,
        crate::routes::devices::device_metrics,
        crate::routes::incidents::list_incidents,
        crate::routes::incidents::acknowledge_incident,
        crate::routes::push::register_push,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequestDoc,
            TokenResponseDoc,
            AckRequestDoc,
            PushRegisterRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "mobile"),
        (name = "devices"),
        (name = "incidents"),
        (name = "push")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/auth/login",
            "/mobile/config",
            "/devices",
            "/metrics/devices/{id}",
            "/incidents",
            "/incidents/{id}/ack",
            "/push/register",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
