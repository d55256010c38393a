//! Service layer for the NOC backend.
//! - `storage::record_store` owns every record and its JSON snapshot file.
//! - `observability` exposes Prometheus counters for store activity.

pub mod errors;
pub mod observability;
pub mod storage;

pub use storage::record_store::{RecordStore, Snapshot};
