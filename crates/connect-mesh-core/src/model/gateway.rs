// ── Gateways and scenes ──

use serde::Serialize;

/// A bridge between the cloud and a mesh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gateway {
    pub id: String,
    pub network_id: String,
    pub firmware: String,
    pub connected: bool,
}

/// A stored scene that can be recalled by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub id: String,
    pub network_id: String,
    pub name: String,
}
