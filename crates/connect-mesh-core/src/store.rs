// ── Shared device registry ──
//
// The set of devices known to a session, shared by every coordinator.
// Discovery reads it as a point-in-time id snapshot and appends to it;
// concurrent appends from other coordinators are expected.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

use crate::model::Device;

/// Concurrent map of device id to device, with a change counter.
#[derive(Debug)]
pub struct DeviceRegistry {
    by_id: DashMap<String, Arc<Device>>,
    /// Bumped on every insert or replace.
    version: watch::Sender<u64>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            by_id: DashMap::new(),
            version,
        }
    }

    /// Seed a registry from an initial device list.
    pub fn from_devices(devices: impl IntoIterator<Item = Arc<Device>>) -> Self {
        let registry = Self::new();
        for device in devices {
            registry.insert_if_absent(device);
        }
        registry
    }

    /// Insert unless the id is already present. Returns `true` if inserted.
    pub fn insert_if_absent(&self, device: Arc<Device>) -> bool {
        let inserted = match self.by_id.entry(device.id().to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(device);
                true
            }
        };
        if inserted {
            self.bump();
        }
        inserted
    }

    /// Overwrite the entry for this device's id.
    pub fn replace(&self, device: Arc<Device>) {
        self.by_id.insert(device.id().to_owned(), device);
        self.bump();
    }

    /// Drop a device, returning it if it was present.
    pub fn remove(&self, id: &str) -> Option<Arc<Device>> {
        let removed = self.by_id.remove(id).map(|(_, device)| device);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<Arc<Device>> {
        self.by_id.get(id).map(|r| Arc::clone(r.value()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids known right now. Later inserts are not reflected.
    pub fn snapshot_ids(&self) -> HashSet<String> {
        self.by_id.iter().map(|r| r.key().clone()).collect()
    }

    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.by_id.iter().map(|r| Arc::clone(r.value())).collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Subscribe to the change counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
