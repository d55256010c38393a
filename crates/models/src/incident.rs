use std::num::NonZeroU32;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    /// Not checked against the device set.
    pub device_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub started_at: String,
    pub resolved_at: Option<String>,
    /// RFC 3339 UTC instant; a single window, replaced on every acknowledgment.
    pub ack_until: Option<String>,
}

impl Incident {
    /// Reset the acknowledgment window to `now + duration`.
    pub fn acknowledge(&mut self, now: DateTime<Utc>, duration: AckDuration) {
        self.ack_until = Some(format_instant(now + duration.as_chrono()));
    }
}

/// Format an instant the way every timestamp in the store is written.
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Length of an acknowledgment window. Always at least one minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AckDuration(NonZeroU32);

impl AckDuration {
    pub const DEFAULT_MINUTES: u32 = 30;

    /// Build from a client-supplied minute count. Zero, negative and
    /// missing values fall back to the default window; positive values
    /// above `u32::MAX` are clamped to it.
    pub fn from_requested(minutes: Option<i64>) -> Self {
        minutes
            .filter(|m| *m > 0)
            .map(|m| u32::try_from(m).unwrap_or(u32::MAX))
            .and_then(NonZeroU32::new)
            .map(Self)
            .unwrap_or_default()
    }

    pub fn minutes(&self) -> u32 {
        self.0.get()
    }

    pub fn as_chrono(&self) -> Duration {
        Duration::minutes(i64::from(self.0.get()))
    }
}

const DEFAULT_WINDOW: NonZeroU32 = match NonZeroU32::new(AckDuration::DEFAULT_MINUTES) {
    Some(m) => m,
    None => panic!("default window is non-zero"),
};

impl Default for AckDuration {
    fn default() -> Self {
        Self(DEFAULT_WINDOW)
    }
}

impl From<NonZeroU32> for AckDuration {
    fn from(m: NonZeroU32) -> Self {
        Self(m)
    }
}
