// ── Mesh configuration ──
//
// Descriptive records from the `network` sub-document of a network
// detail response: keys, provisioners and group addresses. Parsed
// straight from the API's JSON; addresses stay as the hex strings the
// API sends.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshConfiguration {
    pub id: String,
    pub version: String,
    pub mesh_name: String,
    #[serde(rename = "meshUUID")]
    pub mesh_uuid: String,
    pub net_keys: Vec<NetworkKey>,
    pub app_keys: Vec<ApplicationKey>,
    pub provisioners: Vec<Provisioner>,
    pub groups: Vec<GroupAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkKey {
    pub name: String,
    pub index: u16,
    #[serde(skip_serializing)]
    pub key: String,
    pub min_security: String,
    pub phase: u8,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationKey {
    pub name: String,
    pub index: u16,
    pub bound_net_key: u16,
    #[serde(skip_serializing)]
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provisioner {
    pub provisioner_name: String,
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub allocated_unicast_range: Vec<AddressRange>,
    pub allocated_group_range: Vec<AddressRange>,
    pub allocated_scene_range: Vec<SceneRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRange {
    pub low_address: String,
    pub high_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneRange {
    pub first_scene: String,
    pub last_scene: String,
}

/// A group address allocated in the mesh (distinct from a cloud [`Group`](super::Group)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAddress {
    pub name: String,
    pub address: String,
    pub parent_address: String,
}

impl MeshConfiguration {
    pub fn primary_net_key(&self) -> Option<&NetworkKey> {
        self.net_keys.iter().min_by_key(|k| k.index)
    }
}
