use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::Utc;
use models::{
    seed::{seed_devices, seed_incidents, seed_users},
    AckDuration, Device, Incident, PushRegistration, User,
};
use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::errors::ServiceError;
use crate::observability::{
    STORE_ACKNOWLEDGEMENTS_TOTAL, STORE_PERSIST_FAILURES_TOTAL, STORE_PERSIST_TOTAL,
    STORE_PUSH_REGISTRATIONS_TOTAL,
};

/// Every record set held by the store, in the layout of the snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub devices: Vec<Device>,
    pub incidents: Vec<Incident>,
    pub push_tokens: Vec<PushRegistration>,
    pub users: Vec<User>,
}

impl Snapshot {
    /// Three devices, one open incident, no push tokens and the `admin` user.
    pub fn seeded() -> Self {
        Self {
            devices: seed_devices(),
            incidents: seed_incidents(),
            push_tokens: Vec::new(),
            users: seed_users(),
        }
    }
}

/// On-disk form as read back. A set missing from the file keeps its seed value.
#[derive(Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    devices: Option<Vec<Device>>,
    #[serde(default)]
    incidents: Option<Vec<Incident>>,
    #[serde(default)]
    push_tokens: Option<Vec<PushRegistration>>,
    #[serde(default)]
    users: Option<Vec<User>>,
}

impl StoredSnapshot {
    fn overlay(self, base: &mut Snapshot) {
        if let Some(v) = self.devices {
            base.devices = v;
        }
        if let Some(v) = self.incidents {
            base.incidents = v;
        }
        if let Some(v) = self.push_tokens {
            base.push_tokens = v;
        }
        if let Some(v) = self.users {
            base.users = v;
        }
    }
}

/// In-process record store.
///
/// All four record sets sit behind a single reader/writer lock. Reads take the
/// shared side and hand back clones; writes take the exclusive side, mutate,
/// then rewrite the whole snapshot file before any other writer can run.
///
/// Persistence is best effort: write failures are logged and counted but never
/// returned, and the file is overwritten in place (no temp file + rename), so a
/// crash mid-write can leave a truncated snapshot.
pub struct RecordStore {
    inner: RwLock<Snapshot>,
    file_path: Option<PathBuf>,
    persist_failures: AtomicU64,
}

impl RecordStore {
    /// Build the store.
    ///
    /// Without a path (or with an empty one) the store holds seed data and never
    /// touches the disk. With a path, the parent directory is created and the
    /// file, if readable and well formed, replaces the seed sets it contains.
    /// Missing, unreadable or malformed files leave the seed data in place.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Arc<Self> {
        let file_path = path
            .map(|p| p.as_ref().to_path_buf())
            .filter(|p| !p.as_os_str().is_empty());

        let snapshot = match &file_path {
            Some(p) => load_snapshot(p),
            None => {
                info!("record store running in memory with seed data");
                Snapshot::seeded()
            }
        };

        Arc::new(Self {
            inner: RwLock::new(snapshot),
            file_path,
            persist_failures: AtomicU64::new(0),
        })
    }

    /// Seed-only store with persistence disabled.
    pub fn in_memory() -> Arc<Self> {
        Self::open(None::<&Path>)
    }

    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn list_devices(&self) -> Vec<Device> {
        self.inner.read().devices.clone()
    }

    pub fn list_incidents(&self) -> Vec<Incident> {
        self.inner.read().incidents.clone()
    }

    pub fn push_registrations(&self) -> Vec<PushRegistration> {
        self.inner.read().push_tokens.clone()
    }

    /// Set the acknowledgment window of the first incident whose id matches.
    ///
    /// The window is replaced, never extended. Returns `None` when no incident
    /// has this id; nothing is mutated or written in that case.
    pub fn acknowledge_incident(&self, id: &str, duration: AckDuration) -> Option<Incident> {
        let mut guard = self.inner.write();
        let incident = guard.incidents.iter_mut().find(|i| i.id == id)?;
        incident.acknowledge(Utc::now(), duration);
        let updated = incident.clone();
        STORE_ACKNOWLEDGEMENTS_TOTAL.inc();
        debug!(incident = %updated.id, minutes = duration.minutes(), ack_until = ?updated.ack_until, "incident acknowledged");
        self.persist(guard);
        Some(updated)
    }

    /// Append to the push log. No dedup; the caller validates the token.
    pub fn register_push(&self, registration: PushRegistration) {
        let mut guard = self.inner.write();
        guard.push_tokens.push(registration);
        STORE_PUSH_REGISTRATIONS_TOTAL.inc();
        self.persist(guard);
    }

    /// Plain-text credential check against the user set.
    pub fn validate_user(&self, username: &str, password: &str) -> bool {
        self.inner.read().users.iter().any(|u| u.matches(username, password))
    }

    /// Number of snapshot writes that failed since the store was opened.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    /// Write the snapshot while still excluding other writers.
    ///
    /// The write guard is downgraded so readers can proceed during disk I/O,
    /// but no writer can slip in before the file reflects this mutation.
    fn persist(&self, guard: RwLockWriteGuard<'_, Snapshot>) {
        let Some(path) = self.file_path.as_deref() else { return };
        let snapshot = RwLockWriteGuard::downgrade(guard);
        STORE_PERSIST_TOTAL.inc();
        match write_snapshot(path, &snapshot) {
            Ok(()) => debug!(path = %path.display(), "snapshot persisted"),
            Err(e) => {
                self.persist_failures.fetch_add(1, Ordering::Relaxed);
                STORE_PERSIST_FAILURES_TOTAL.inc();
                error!(path = %path.display(), error = %e, "failed to persist snapshot; change kept in memory only");
            }
        }
    }
}

fn load_snapshot(path: &Path) -> Snapshot {
    let mut snapshot = Snapshot::seeded();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            debug!(dir = %parent.display(), error = %e, "cannot create store directory");
        }
    }

    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => {
            info!(path = %path.display(), "snapshot file empty; using seed data");
        }
        Ok(bytes) => match serde_json::from_slice::<StoredSnapshot>(&bytes) {
            Ok(stored) => {
                stored.overlay(&mut snapshot);
                info!(
                    path = %path.display(),
                    devices = snapshot.devices.len(),
                    incidents = snapshot.incidents.len(),
                    push_tokens = snapshot.push_tokens.len(),
                    users = snapshot.users.len(),
                    "record store loaded from snapshot"
                );
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot file malformed; using seed data");
            }
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no snapshot yet; using seed data");
        }
        Err(e) => {
            let e = ServiceError::persistence(path, e);
            warn!(error = %e, "snapshot file unreadable; using seed data");
        }
    }
    snapshot
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(snapshot)?;
    fs::write(path, data).map_err(|e| ServiceError::persistence(path, e))
}
