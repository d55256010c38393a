//! Fixed records used when the store starts without a snapshot file.

use chrono::Utc;

use crate::{
    device::{Device, DeviceRole},
    incident::{format_instant, Incident},
    user::User,
};

pub fn seed_devices() -> Vec<Device> {
    vec![
        Device {
            id: "gw-1".into(),
            name: "Gateway-1".into(),
            role: DeviceRole::Gateway,
            site_id: "site-1".into(),
            online: true,
            latency_ms: Some(12.0),
            ack_until: None,
        },
        Device {
            id: "ap-1".into(),
            name: "AP-1".into(),
            role: DeviceRole::AccessPoint,
            site_id: "site-1".into(),
            online: false,
            latency_ms: None,
            ack_until: None,
        },
        Device {
            id: "sw-1".into(),
            name: "Switch-1".into(),
            role: DeviceRole::Switch,
            site_id: "site-1".into(),
            online: true,
            latency_ms: Some(3.0),
            ack_until: None,
        },
    ]
}

pub fn seed_incidents() -> Vec<Incident> {
    vec![Incident {
        id: "inc-1".into(),
        device_id: "ap-1".into(),
        kind: "offline".into(),
        severity: "critical".into(),
        started_at: format_instant(Utc::now()),
        resolved_at: None,
        ack_until: None,
    }]
}

pub fn seed_users() -> Vec<User> {
    vec![User { username: "admin".into(), password: "admin".into() }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_shape() {
        assert_eq!(seed_devices().len(), 3);
        let incidents = seed_incidents();
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].id, "inc-1");
        assert!(incidents[0].ack_until.is_none());
        assert!(seed_users()[0].matches("admin", "admin"));
    }

    #[test]
    fn seed_incident_targets_offline_ap() {
        let devices = seed_devices();
        let inc = &seed_incidents()[0];
        let target = devices.iter().find(|d| d.id == inc.device_id).unwrap();
        assert!(!target.online);
    }
}
