// ── Domain API ──
//
// `MeshApi` is the typed face of the cloud API: it calls `MeshClient`,
// converts wire records into domain models, and validates capabilities
// and parameter ranges before anything is sent.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use connect_mesh_api::{CommandOptions, MeshClient};

use crate::error::CoreError;
use crate::model::{Device, Gateway, Group, Network, Scene};
use crate::scale::{self, MESH_MAX};
use crate::status::DeviceStatus;

/// Typed operations over a shared [`MeshClient`].
///
/// Cheap to clone; every clone shares the client, its retry policy and its
/// rate limiter.
#[derive(Debug, Clone)]
pub struct MeshApi {
    client: Arc<MeshClient>,
    /// Per-request timeout for device reads. `None` uses the client default.
    request_timeout: Option<Duration>,
}

impl MeshApi {
    pub fn new(client: MeshClient) -> Self {
        Self::from_shared(Arc::new(client))
    }

    pub fn from_shared(client: Arc<MeshClient>) -> Self {
        Self {
            client,
            request_timeout: None,
        }
    }

    /// Bound device listing, detail and status reads by `timeout` instead
    /// of the client default. The clone still shares the client.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn client(&self) -> &MeshClient {
        &self.client
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// All networks; entries that fail to convert are skipped.
    pub async fn list_networks(&self) -> Result<Vec<Network>, CoreError> {
        let records = self.client.list_networks().await?;
        Ok(records
            .into_iter()
            .filter_map(|r| {
                let id = r.id.clone();
                Network::try_from(r)
                    .inspect_err(|e| warn!(network_id = %id, error = %e, "skipping network"))
                    .ok()
            })
            .collect())
    }

    pub async fn get_network(&self, network_id: &str) -> Result<Network, CoreError> {
        let record = self.client.get_network(network_id).await.map_err(|e| {
            if e.is_not_found() {
                CoreError::NetworkNotFound {
                    identifier: network_id.to_owned(),
                }
            } else {
                e.into()
            }
        })?;
        Network::try_from(record)
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// All known-type devices. Unknown device types are logged and skipped.
    pub async fn list_devices(&self) -> Result<Vec<Arc<Device>>, CoreError> {
        let records = self.client.list_devices_within(self.request_timeout).await?;
        let devices: Vec<Arc<Device>> = records
            .into_iter()
            .filter_map(|r| match Device::try_from(r) {
                Ok(device) => Some(Arc::new(device)),
                Err(e) => {
                    warn!(error = %e, "skipping device");
                    None
                }
            })
            .collect();
        debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    pub async fn list_devices_for_network(
        &self,
        network_id: &str,
    ) -> Result<Vec<Arc<Device>>, CoreError> {
        let mut devices = self.list_devices().await?;
        devices.retain(|d| d.network_id() == network_id);
        Ok(devices)
    }

    pub async fn get_device(&self, device_id: &str) -> Result<Device, CoreError> {
        let record = self
            .client
            .get_device_within(device_id, self.request_timeout)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    CoreError::DeviceNotFound {
                        identifier: device_id.to_owned(),
                    }
                } else {
                    e.into()
                }
            })?;
        Device::try_from(record)
    }

    /// Current status, normalized for the device's class.
    ///
    /// Throttled to one call per second per device by the client's limiter.
    pub async fn get_device_status(&self, device: &Device) -> Result<DeviceStatus, CoreError> {
        let record = self
            .client
            .get_device_status_within(device.id(), self.request_timeout)
            .await?;
        DeviceStatus::from_state(&record.state, device)
    }

    // ── Device commands ──────────────────────────────────────────────

    pub async fn set_power(
        &self,
        device: &Device,
        on: bool,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        self.client.set_power(device.id(), on, opts).await?;
        device.touch();
        Ok(())
    }

    pub async fn power_on(&self, device: &Device) -> Result<(), CoreError> {
        self.set_power(device, true, CommandOptions::default()).await
    }

    pub async fn power_off(&self, device: &Device) -> Result<(), CoreError> {
        self.set_power(device, false, CommandOptions::default()).await
    }

    /// Set lightness in `[0, 1]`. Lights only.
    pub async fn set_lightness(
        &self,
        device: &Device,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        require(device, device.is_light(), "lightness")?;
        let lightness = scale::check_float("lightness", lightness, 0.0, 1.0)?;
        self.client.set_lightness(device.id(), lightness, opts).await?;
        device.touch();
        Ok(())
    }

    /// Set color temperature on the 0–65535 mesh scale.
    pub async fn set_temperature(
        &self,
        device: &Device,
        temperature: i64,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        require(device, device.supports_color_temp(), "color temperature")?;
        let temperature = scale::check_int("temperature", temperature, 0, MESH_MAX)?;
        self.client
            .set_temperature(device.id(), temperature, opts)
            .await?;
        device.touch();
        Ok(())
    }

    /// Set color as hue (0–360), saturation and lightness (both 0–1).
    pub async fn set_hsl(
        &self,
        device: &Device,
        hue: f64,
        saturation: f64,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        require(device, device.supports_hsl(), "HSL color")?;
        let hue = scale::check_float("hue", hue, 0.0, 360.0)?;
        let saturation = scale::check_float("saturation", saturation, 0.0, 1.0)?;
        let lightness = scale::check_float("lightness", lightness, 0.0, 1.0)?;
        self.client
            .set_hsl(device.id(), hue, saturation, lightness, opts)
            .await?;
        device.touch();
        Ok(())
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Result<Vec<Group>, CoreError> {
        let records = self.client.list_groups().await?;
        Ok(records.into_iter().map(Group::from).collect())
    }

    pub async fn list_groups_for_network(&self, network_id: &str) -> Result<Vec<Group>, CoreError> {
        let mut groups = self.list_groups().await?;
        groups.retain(|g| g.network_id().eq_ignore_ascii_case(network_id));
        Ok(groups)
    }

    pub async fn set_group_power(
        &self,
        group: &Group,
        on: bool,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        self.client
            .set_group_power(group.id(), group.network_id(), on, opts)
            .await?;
        Ok(())
    }

    pub async fn set_group_lightness(
        &self,
        group: &Group,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), CoreError> {
        let lightness = scale::check_float("lightness", lightness, 0.0, 1.0)?;
        self.client
            .set_group_lightness(group.id(), group.network_id(), lightness, opts)
            .await?;
        Ok(())
    }

    // ── Scenes and gateways ──────────────────────────────────────────

    pub async fn list_scenes(&self) -> Result<Vec<Scene>, CoreError> {
        let records = self.client.list_scenes().await?;
        Ok(records.into_iter().map(Scene::from).collect())
    }

    pub async fn recall_scene(&self, scene_id: &str) -> Result<(), CoreError> {
        Ok(self.client.recall_scene(scene_id).await?)
    }

    pub async fn list_gateways(&self) -> Result<Vec<Gateway>, CoreError> {
        let records = self.client.list_gateways().await?;
        Ok(records.into_iter().map(Gateway::from).collect())
    }

    pub async fn ping_gateway(&self, gateway_id: &str) -> Result<Value, CoreError> {
        Ok(self.client.ping_gateway(gateway_id).await?)
    }
}

fn require(device: &Device, supported: bool, capability: &'static str) -> Result<(), CoreError> {
    if supported {
        Ok(())
    } else {
        Err(CoreError::UnsupportedCapability {
            device: device.id().to_owned(),
            capability,
        })
    }
}
