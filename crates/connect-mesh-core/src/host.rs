// ── Host port ──
//
// The polling engine does not own entities, a device registry or a
// reauthentication flow. It asks whoever embeds it for those through
// `MeshHost`.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::coordinator::PollSnapshot;
use crate::error::CoreError;
use crate::model::Device;

/// What kind of entity the host should create for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Light,
    Switch,
    /// Freshness readouts (`last_update`, `last_update_success`).
    Diagnostic,
}

/// A request to create one entity for a newly discovered device.
#[derive(Debug, Clone)]
pub struct EntityRequest {
    pub unique_id: String,
    pub kind: EntityKind,
    pub device: Arc<Device>,
}

impl EntityRequest {
    /// Entities appropriate for `device`'s capabilities, in creation order.
    pub fn for_device(device: &Arc<Device>) -> Vec<Self> {
        let id = device.id();
        let mut requests = Vec::with_capacity(3);
        if device.is_light() {
            requests.push(Self::new(format!("{id}_light"), EntityKind::Light, device));
        } else if device.is_switch() {
            requests.push(Self::new(format!("{id}_switch"), EntityKind::Switch, device));
        }
        requests.push(Self::new(
            format!("{id}_last_update"),
            EntityKind::Diagnostic,
            device,
        ));
        requests.push(Self::new(
            format!("{id}_last_update_success"),
            EntityKind::Diagnostic,
            device,
        ));
        requests
    }

    fn new(unique_id: String, kind: EntityKind, device: &Arc<Device>) -> Self {
        Self {
            unique_id,
            kind,
            device: Arc::clone(device),
        }
    }
}

/// Collaborator supplied by the embedding application.
///
/// All methods are called from coordinator tasks, so implementations must
/// be `Send + Sync` and their futures `Send`.
pub trait MeshHost: Send + Sync + 'static {
    /// A device's name changed upstream; update the host's registry.
    fn rename_device(
        &self,
        device: &Device,
        new_name: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Whether an entity with this unique id already exists.
    fn entity_exists(&self, unique_id: &str) -> impl Future<Output = bool> + Send;

    fn create_entity(
        &self,
        request: EntityRequest,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// The API rejected the token. Start whatever reauth flow the host has.
    fn request_reauth(&self) -> impl Future<Output = ()> + Send;

    /// Called after every primary poll cycle. Default is a no-op.
    fn on_snapshot(
        &self,
        _device: &Device,
        _snapshot: &PollSnapshot,
    ) -> impl Future<Output = ()> + Send {
        async {}
    }
}
