//! Request and response bodies of the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{device::Device, incident::AckDuration};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MobileConfig {
    pub uisp_base_url: String,
    pub api_base_url: String,
    pub feature_flags: BTreeMap<String, bool>,
    #[serde(rename = "push_register_url")]
    pub push_register: String,
    pub environment: String,
    pub version: String,
    pub banner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DevicesResponse {
    /// Epoch milliseconds.
    pub last_updated: i64,
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AckRequest {
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

impl AckRequest {
    pub fn duration(&self) -> AckDuration {
        AckDuration::from_requested(self.duration_minutes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushRegisterResponse {
    pub request_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    /// Epoch milliseconds.
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    /// Epoch seconds.
    pub timestamp: i64,
    pub latency: f64,
    pub cpu: f64,
    pub ram: f64,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceMetrics {
    pub device_id: String,
    pub points: Vec<MetricPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ack_request_tolerates_missing_field() {
        let req: AckRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.duration().minutes(), 30);
        let req: AckRequest = serde_json::from_str(r#"{"duration_minutes": 120}"#).unwrap();
        assert_eq!(req.duration().minutes(), 120);
        let req: AckRequest = serde_json::from_str(r#"{"duration_minutes": -1}"#).unwrap();
        assert_eq!(req.duration().minutes(), 30);
    }

    #[test]
    fn mobile_config_wire_names() {
        let cfg = MobileConfig {
            uisp_base_url: "http://localhost".into(),
            api_base_url: "http://localhost:8080".into(),
            feature_flags: BTreeMap::from([("native_api".to_string(), true)]),
            push_register: "http://localhost:8080/push/register".into(),
            environment: "dev".into(),
            version: "0.1.0".into(),
            banner: "Demo backend".into(),
        };
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["push_register_url"], "http://localhost:8080/push/register");
        assert_eq!(v["feature_flags"]["native_api"], true);
    }
}
