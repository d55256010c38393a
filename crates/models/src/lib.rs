//! Record types held by the NOC record store, their seed values and the
//! request/response shapes exchanged with the mobile client.

pub mod errors;
pub mod device;
pub mod incident;
pub mod push;
pub mod user;
pub mod seed;
pub mod api;

pub use device::{Device, DeviceRole};
pub use incident::{AckDuration, Incident};
pub use push::PushRegistration;
pub use user::User;
