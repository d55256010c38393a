use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub time: String,
}

impl Health {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Uniform error body returned by every HTTP endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
