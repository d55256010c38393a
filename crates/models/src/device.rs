use std::fmt;

use serde::{Deserialize, Serialize};

/// Network role of a managed device.
///
/// The set is open: roles this build does not know are kept verbatim in
/// `Other` so a snapshot written by a newer client survives a rewrite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceRole {
    Gateway,
    AccessPoint,
    Switch,
    Router,
    Station,
    Other(String),
}

impl DeviceRole {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceRole::Gateway => "gateway",
            DeviceRole::AccessPoint => "ap",
            DeviceRole::Switch => "switch",
            DeviceRole::Router => "router",
            DeviceRole::Station => "station",
            DeviceRole::Other(role) => role,
        }
    }
}

impl From<String> for DeviceRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "gateway" => DeviceRole::Gateway,
            "ap" => DeviceRole::AccessPoint,
            "switch" => DeviceRole::Switch,
            "router" => DeviceRole::Router,
            "station" => DeviceRole::Station,
            _ => DeviceRole::Other(role),
        }
    }
}

impl From<DeviceRole> for String {
    fn from(role: DeviceRole) -> Self {
        match role {
            DeviceRole::Other(role) => role,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub role: DeviceRole,
    pub site_id: String,
    pub online: bool,
    pub latency_ms: Option<f64>,
    /// Epoch milliseconds until which alerts for this device are suppressed.
    pub ack_until: Option<i64>,
}
