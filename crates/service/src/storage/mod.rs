//! Storage for the service layer
//!
//! A single JSON file-backed aggregate holding devices, incidents, push
//! registrations and users behind one reader/writer lock.

pub mod record_store;
