// ── Network domain type ──

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

use super::device::{Device, Touchstamp};
use super::device_type::DeviceType;
use super::group::Group;
use super::mesh::MeshConfiguration;

/// A mesh network (one installation).
///
/// The device and group caches are filled at most once, from whatever list
/// the first `populate_*` call supplies. Later calls are no-ops that return
/// the cached slice; refreshing means building a new `Network`.
#[derive(Debug, Serialize)]
pub struct Network {
    pub(crate) id: String,
    #[serde(skip_serializing)]
    pub(crate) network_key: SecretString,
    pub(crate) name: String,
    pub(crate) creation_date: DateTime<Utc>,
    pub(crate) update_date: DateTime<Utc>,
    pub(crate) mesh: Option<MeshConfiguration>,
    pub(crate) last_updated: Touchstamp,
    #[serde(skip_serializing)]
    pub(crate) devices: OnceLock<Vec<Arc<Device>>>,
    #[serde(skip_serializing)]
    pub(crate) groups: OnceLock<Vec<Arc<Group>>>,
}

impl Network {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn network_key(&self) -> &SecretString {
        &self.network_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn update_date(&self) -> DateTime<Utc> {
        self.update_date
    }

    pub fn mesh(&self) -> Option<&MeshConfiguration> {
        self.mesh.as_ref()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated.get()
    }

    pub fn touch(&self) {
        self.last_updated.touch();
    }

    // ── Device cache ─────────────────────────────────────────────────

    /// Keep the devices belonging to this network. First call wins.
    pub fn populate_devices(&self, devices: &[Arc<Device>]) -> &[Arc<Device>] {
        self.devices.get_or_init(|| {
            devices
                .iter()
                .filter(|d| d.network_id() == self.id)
                .cloned()
                .collect()
        })
    }

    /// Keep the groups belonging to this network. First call wins.
    pub fn populate_groups(&self, groups: &[Arc<Group>]) -> &[Arc<Group>] {
        self.groups.get_or_init(|| {
            groups
                .iter()
                .filter(|g| g.network_id().eq_ignore_ascii_case(&self.id))
                .cloned()
                .collect()
        })
    }

    pub fn is_populated(&self) -> bool {
        self.devices.get().is_some()
    }

    /// Cached devices; empty until [`populate_devices`](Self::populate_devices).
    pub fn devices(&self) -> &[Arc<Device>] {
        self.devices.get().map_or(&[], Vec::as_slice)
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        self.groups.get().map_or(&[], Vec::as_slice)
    }

    pub fn device_count(&self) -> usize {
        self.devices().len()
    }

    pub fn device_by_id(&self, id: &str) -> Option<&Arc<Device>> {
        self.devices().iter().find(|d| d.id() == id)
    }

    pub fn devices_by_type(&self, device_type: DeviceType) -> Vec<&Arc<Device>> {
        self.devices()
            .iter()
            .filter(|d| d.device_type() == device_type)
            .collect()
    }

    pub fn device_types(&self) -> HashSet<DeviceType> {
        self.devices().iter().map(|d| d.device_type()).collect()
    }

    pub fn lights(&self) -> Vec<&Arc<Device>> {
        self.devices().iter().filter(|d| d.is_light()).collect()
    }

    pub fn sockets(&self) -> Vec<&Arc<Device>> {
        self.devices().iter().filter(|d| d.is_socket()).collect()
    }

    pub fn sensors(&self) -> Vec<&Arc<Device>> {
        self.devices().iter().filter(|d| d.is_sensor()).collect()
    }
}
