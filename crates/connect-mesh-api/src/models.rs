// Wire types for the Connect Mesh cloud API
//
// These mirror the JSON the API actually sends, field for field, with
// no interpretation beyond serde renames. Typed domain models with
// capability lookups and validation live in `connect-mesh-core`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Devices ─────────────────────────────────────────────────────────

/// A device as returned by `GET /devices` and `GET /devices/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub network_id: String,
    pub unicast_address: u16,
    /// Mesh-internal object id. Not the id used by status and command
    /// endpoints; that is `unique_id`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub ble_address: String,
    pub mac_bytes: String,
    pub bootloader_version: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub unique_id: String,
    pub device_key: String,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

/// One addressable element of a mesh node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub device_id: String,
    pub unicast_address: u16,
    #[serde(default)]
    pub models: Vec<u32>,
}

/// Body of `GET /devices/{id}/status`.
///
/// `state` is kept as a raw JSON object; what it contains depends on the
/// device class and is normalized in `connect-mesh-core`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatusRecord {
    pub state: serde_json::Map<String, Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ── Networks ────────────────────────────────────────────────────────

/// A network as returned by `GET /networks` and `GET /networks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
    pub id: String,
    pub network_key: String,
    pub name: String,
    pub creation_date: String,
    pub update_date: String,
    /// Mesh configuration sub-document. Sent either as an object or as a
    /// JSON-encoded string, and only on the detail endpoint.
    #[serde(default)]
    pub network: Option<Value>,
}

// ── Groups, scenes, gateways ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: String,
    pub network_id: String,
    pub name: String,
    #[serde(default)]
    pub device_entries: Vec<GroupEntryRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntryRecord {
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRecord {
    pub id: String,
    pub network_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRecord {
    pub id: String,
    pub network_id: String,
    pub firmware: String,
    pub connected: bool,
}

// ── Commands ────────────────────────────────────────────────────────

/// Mesh-level delivery options shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Wait for the node to acknowledge.
    pub acknowledged: bool,
    /// Retransmissions inside the mesh (not HTTP retries).
    pub retries: u32,
    /// Mesh operation timeout.
    pub timeout_ms: u64,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            acknowledged: true,
            retries: 0,
            timeout_ms: 10_000,
        }
    }
}

impl CommandOptions {
    /// HTTP budget for a command: the mesh timeout plus one second.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms.saturating_add(1_000))
    }
}

/// Target-specific part of a command body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CommandBody {
    Power { power: PowerState },
    Lightness { lightness: f64 },
    Temperature { temperature: u16 },
    Hsl { hue: f64, saturation: f64, lightness: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Addressee of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget<'a> {
    Device { unique_id: &'a str },
    Group { group_id: &'a str, network_id: &'a str },
}

/// Full command payload as sent on the wire.
#[derive(Debug, Serialize)]
pub(crate) struct CommandPayload<'a> {
    #[serde(rename = "uniqueId", skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<&'a str>,
    #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<&'a str>,
    #[serde(rename = "networkId", skip_serializing_if = "Option::is_none")]
    pub network_id: Option<&'a str>,
    pub acknowledged: bool,
    pub retries: u32,
    pub timeout_ms: u64,
    #[serde(flatten)]
    pub body: &'a CommandBody,
}

impl<'a> CommandPayload<'a> {
    pub(crate) fn new(target: CommandTarget<'a>, body: &'a CommandBody, opts: CommandOptions) -> Self {
        let (unique_id, group_id, network_id) = match target {
            CommandTarget::Device { unique_id } => (Some(unique_id), None, None),
            CommandTarget::Group {
                group_id,
                network_id,
            } => (None, Some(group_id), Some(network_id)),
        };
        Self {
            unique_id,
            group_id,
            network_id,
            acknowledged: opts.acknowledged,
            retries: opts.retries,
            timeout_ms: opts.timeout_ms,
            body,
        }
    }
}

/// Acknowledgement envelope returned by command endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CommandResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// List endpoints occasionally return a bare object instead of an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn device_record_from_api_json() {
        let raw = json!({
            "networkId": "net-1",
            "unicastAddress": 2,
            "id": "obj-1",
            "name": "Kitchen",
            "bleAddress": "aabbccddeeff",
            "macBytes": "qrvM3e7/",
            "bootloaderVersion": "1.2.3",
            "type": "com.haefele.led.rgb",
            "uniqueId": "dev-1",
            "deviceKey": "key",
            "elements": [{ "deviceId": "obj-1", "unicastAddress": 2, "models": [4096, 4864] }]
        });

        let record: DeviceRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.unique_id, "dev-1");
        assert_eq!(record.device_type, "com.haefele.led.rgb");
        assert_eq!(record.description, None);
        assert_eq!(record.elements[0].models, vec![4096, 4864]);
    }

    #[test]
    fn device_command_payload_shape() {
        let body = CommandBody::Power {
            power: PowerState::On,
        };
        let payload = CommandPayload::new(
            CommandTarget::Device { unique_id: "dev-1" },
            &body,
            CommandOptions::default(),
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "uniqueId": "dev-1",
                "acknowledged": true,
                "retries": 0,
                "timeout_ms": 10000,
                "power": "on"
            })
        );
    }

    #[test]
    fn group_command_payload_shape() {
        let body = CommandBody::Lightness { lightness: 0.5 };
        let opts = CommandOptions {
            acknowledged: false,
            retries: 2,
            timeout_ms: 3000,
        };
        let payload = CommandPayload::new(
            CommandTarget::Group {
                group_id: "grp-1",
                network_id: "net-1",
            },
            &body,
            opts,
        );
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "groupId": "grp-1",
                "networkId": "net-1",
                "acknowledged": false,
                "retries": 2,
                "timeout_ms": 3000,
                "lightness": 0.5
            })
        );
    }

    #[test]
    fn http_timeout_adds_one_second() {
        let opts = CommandOptions::default();
        assert_eq!(opts.http_timeout(), std::time::Duration::from_secs(11));
    }

    #[test]
    fn one_or_many_accepts_bare_object() {
        let one: OneOrMany<GatewayRecord> = serde_json::from_value(json!({
            "id": "gw", "networkId": "n", "firmware": "1.0", "connected": true
        }))
        .unwrap();
        let list: Vec<GatewayRecord> = one.into();
        assert_eq!(list.len(), 1);
    }
}
