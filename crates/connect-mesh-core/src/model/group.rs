// ── Group domain type ──

use std::sync::Arc;

use serde::Serialize;

use super::device::Device;
use super::device_type::Capabilities;

/// A cloud-side group of devices that can be commanded together.
///
/// Ids are normalized to lower case on construction. Capability checks are
/// "every member can", evaluated against a caller-supplied device list; a
/// group with no resolvable members can do nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub(crate) id: String,
    pub(crate) network_id: String,
    pub(crate) name: String,
    pub(crate) device_ids: Vec<String>,
}

impl Group {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device_ids(&self) -> &[String] {
        &self.device_ids
    }

    pub fn device_count(&self) -> usize {
        self.device_ids.len()
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.device_ids
            .iter()
            .any(|id| id.eq_ignore_ascii_case(device_id))
    }

    /// Member devices found in `devices`, in member order.
    pub fn resolve_members(&self, devices: &[Arc<Device>]) -> Vec<Arc<Device>> {
        self.device_ids
            .iter()
            .filter_map(|id| {
                devices
                    .iter()
                    .find(|d| d.id().eq_ignore_ascii_case(id))
                    .cloned()
            })
            .collect()
    }

    /// Intersection of member capabilities.
    pub fn capabilities(&self, devices: &[Arc<Device>]) -> Capabilities {
        let members = self.resolve_members(devices);
        let Some((first, rest)) = members.split_first() else {
            return Capabilities::default();
        };
        rest.iter().fold(first.capabilities(), |acc, d| {
            let c = d.capabilities();
            Capabilities {
                is_light: acc.is_light && c.is_light,
                is_socket: acc.is_socket && c.is_socket,
                is_sensor: acc.is_sensor && c.is_sensor,
                supports_color_temp: acc.supports_color_temp && c.supports_color_temp,
                supports_hsl: acc.supports_hsl && c.supports_hsl,
            }
        })
    }

    pub fn is_light(&self, devices: &[Arc<Device>]) -> bool {
        self.capabilities(devices).is_light
    }

    pub fn is_switch(&self, devices: &[Arc<Device>]) -> bool {
        self.capabilities(devices).is_socket
    }

    pub fn is_sensor(&self, devices: &[Arc<Device>]) -> bool {
        self.capabilities(devices).is_sensor
    }

    pub fn supports_color_temp(&self, devices: &[Arc<Device>]) -> bool {
        self.capabilities(devices).supports_color_temp
    }

    pub fn supports_hsl(&self, devices: &[Arc<Device>]) -> bool {
        self.capabilities(devices).supports_hsl
    }
}
