// ── Network session ──
//
// Runs one coordinator per device of a network, all sharing one API
// handle, one registry and one host, and stops them together.

use std::sync::Arc;

use futures_util::stream::{SelectAll, select_all};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::MeshApi;
use crate::config::SessionConfig;
use crate::coordinator::{DeviceCoordinator, PollSnapshot};
use crate::error::CoreError;
use crate::host::MeshHost;
use crate::model::Device;
use crate::store::DeviceRegistry;

/// All coordinators for one network.
pub struct NetworkSession<H: MeshHost> {
    config: SessionConfig,
    registry: Arc<DeviceRegistry>,
    coordinators: Vec<DeviceCoordinator<H>>,
    cancel: CancellationToken,
}

impl<H: MeshHost> NetworkSession<H> {
    /// List the network's devices and build a coordinator for each.
    ///
    /// Nothing is polled until [`start`](Self::start).
    pub async fn connect(api: MeshApi, host: Arc<H>, config: SessionConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let devices = api.list_devices_for_network(&config.network_id).await?;
        info!(
            network_id = %config.network_id,
            devices = devices.len(),
            "starting network session"
        );
        Ok(Self::with_devices(api, host, config, devices))
    }

    /// Build a session over an already-known device list.
    pub fn with_devices(
        api: MeshApi,
        host: Arc<H>,
        config: SessionConfig,
        devices: Vec<Arc<Device>>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let registry = Arc::new(DeviceRegistry::from_devices(devices.iter().cloned()));
        let coordinators = devices
            .into_iter()
            .map(|device| {
                DeviceCoordinator::with_cancellation(
                    api.clone(),
                    device,
                    Arc::clone(&registry),
                    Arc::clone(&host),
                    &config,
                    cancel.child_token(),
                )
            })
            .collect();

        Self {
            config,
            registry,
            coordinators,
            cancel,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn coordinators(&self) -> &[DeviceCoordinator<H>] {
        &self.coordinators
    }

    pub fn coordinator(&self, device_id: &str) -> Option<&DeviceCoordinator<H>> {
        self.coordinators
            .iter()
            .find(|c| c.device().id() == device_id)
    }

    pub fn start(&self) {
        for coordinator in &self.coordinators {
            coordinator.start();
        }
    }

    /// Every coordinator's snapshot updates, merged.
    pub fn snapshots(&self) -> SelectAll<WatchStream<PollSnapshot>> {
        select_all(self.coordinators.iter().map(DeviceCoordinator::snapshots))
    }

    /// Cancel every coordinator and wait for their loops to exit.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        futures_util::future::join_all(self.coordinators.iter().map(DeviceCoordinator::shutdown))
            .await;
        info!(network_id = %self.config.network_id, "network session stopped");
    }
}
