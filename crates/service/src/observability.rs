use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

use crate::errors::ServiceError;

// Prometheus metrics (default registry)
pub static STORE_PERSIST_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "noc_store_persist_total",
        "Snapshot writes attempted by the record store"
    )
    .expect("register store_persist_total")
});

pub static STORE_PERSIST_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "noc_store_persist_failures_total",
        "Snapshot writes that failed and were dropped"
    )
    .expect("register store_persist_failures_total")
});

pub static STORE_ACKNOWLEDGEMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "noc_store_acknowledgements_total",
        "Incident acknowledgments applied"
    )
    .expect("register store_acknowledgements_total")
});

pub static STORE_PUSH_REGISTRATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "noc_store_push_registrations_total",
        "Push registrations appended"
    )
    .expect("register store_push_registrations_total")
});

/// Force registration so every counter shows up in the first scrape.
pub fn init() {
    Lazy::force(&STORE_PERSIST_TOTAL);
    Lazy::force(&STORE_PERSIST_FAILURES_TOTAL);
    Lazy::force(&STORE_ACKNOWLEDGEMENTS_TOTAL);
    Lazy::force(&STORE_PUSH_REGISTRATIONS_TOTAL);
}

/// Render the default registry in the Prometheus text format.
pub fn gather_text() -> Result<String, ServiceError> {
    init();
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buf)
        .map_err(|e| ServiceError::Metrics(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ServiceError::Metrics(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_contains_store_counters() {
        let text = gather_text().unwrap();
        assert!(text.contains("noc_store_persist_total"));
        assert!(text.contains("noc_store_persist_failures_total"));
        assert!(text.contains("noc_store_acknowledgements_total"));
        assert!(text.contains("noc_store_push_registrations_total"));
    }
}
