use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A mobile client's push token registration. The store keeps these as an
/// append-only log; re-registering the same token adds another entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRegistration {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub locale: String,
}

impl PushRegistration {
    /// Checked by the caller before the registration reaches the store.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.token.trim().is_empty() {
            return Err(ModelError::Validation("token is required".into()));
        }
        Ok(())
    }
}
