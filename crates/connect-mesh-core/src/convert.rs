// ── API-to-domain type conversions ──
//
// Bridges raw `connect_mesh_api` wire records into the typed domain model.
// Device types are resolved against the closed vocabulary here, dates are
// parsed, and the optional mesh sub-document is decoded leniently.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde_json::Value;
use tracing::warn;

use connect_mesh_api::{DeviceRecord, GatewayRecord, GroupRecord, NetworkRecord, SceneRecord};

use crate::error::CoreError;
use crate::model::{
    Device, DeviceType, Element, Gateway, Group, MeshConfiguration, Network, Scene, Touchstamp,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an API timestamp such as `2024-10-17T13:59:36.446Z` or
/// `2024-10-17T13:59:36Z`.
pub(crate) fn parse_api_date(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::validation(format!("invalid date format: {raw}")))
}

/// Decode the `network` sub-document, which may arrive as an object or as
/// a JSON-encoded string. Anything unparseable yields `None`.
pub(crate) fn parse_mesh(network_id: &str, raw: Option<Value>) -> Option<MeshConfiguration> {
    let value = match raw? {
        Value::Null => return None,
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(network_id, error = %e, "mesh configuration is not valid JSON, ignoring");
                return None;
            }
        },
        other => other,
    };

    match serde_json::from_value(value) {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            warn!(network_id, error = %e, "malformed mesh configuration, ignoring");
            None
        }
    }
}

// ── Device ─────────────────────────────────────────────────────────

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(r: DeviceRecord) -> Result<Self, Self::Error> {
        let device_type =
            DeviceType::from_str(&r.device_type).map_err(|_| CoreError::UnknownDeviceType {
                device: r.unique_id.clone(),
                device_type: r.device_type.clone(),
            })?;

        Ok(Device {
            id: r.unique_id,
            object_id: r.id,
            network_id: r.network_id,
            unicast_address: r.unicast_address,
            name: r.name,
            description: r.description,
            ble_address: r.ble_address,
            mac_bytes: r.mac_bytes,
            bootloader_version: r.bootloader_version,
            device_type,
            capabilities: device_type.capabilities(),
            device_key: r.device_key,
            elements: r
                .elements
                .into_iter()
                .map(|e| Element {
                    device_id: e.device_id,
                    unicast_address: e.unicast_address,
                    models: e.models,
                })
                .collect(),
            last_updated: Touchstamp::now(),
        })
    }
}

// ── Network ────────────────────────────────────────────────────────

impl TryFrom<NetworkRecord> for Network {
    type Error = CoreError;

    fn try_from(r: NetworkRecord) -> Result<Self, Self::Error> {
        let creation_date = parse_api_date(&r.creation_date)?;
        let update_date = parse_api_date(&r.update_date)?;
        let mesh = parse_mesh(&r.id, r.network);

        Ok(Network {
            id: r.id,
            network_key: SecretString::from(r.network_key),
            name: r.name,
            creation_date,
            update_date,
            mesh,
            last_updated: Touchstamp::now(),
            devices: OnceLock::new(),
            groups: OnceLock::new(),
        })
    }
}

// ── Group / gateway / scene ────────────────────────────────────────

impl From<GroupRecord> for Group {
    fn from(r: GroupRecord) -> Self {
        Group {
            id: r.id.to_lowercase(),
            network_id: r.network_id.to_lowercase(),
            name: r.name,
            device_ids: r
                .device_entries
                .into_iter()
                .map(|e| e.device_id.to_lowercase())
                .collect(),
        }
    }
}

impl From<GatewayRecord> for Gateway {
    fn from(r: GatewayRecord) -> Self {
        Gateway {
            id: r.id,
            network_id: r.network_id,
            firmware: r.firmware,
            connected: r.connected,
        }
    }
}

impl From<SceneRecord> for Scene {
    fn from(r: SceneRecord) -> Self {
        Scene {
            id: r.id,
            network_id: r.network_id,
            name: r.name,
        }
    }
}
