// Scene and gateway endpoints

use serde_json::{Value, json};
use tracing::debug;

use crate::client::MeshClient;
use crate::error::Error;
use crate::models::{GatewayRecord, OneOrMany, SceneRecord};

impl MeshClient {
    /// `GET /scenes`
    pub async fn list_scenes(&self) -> Result<Vec<SceneRecord>, Error> {
        debug!("listing scenes");
        let scenes: OneOrMany<SceneRecord> = self.get("scenes", None).await?;
        Ok(scenes.into())
    }

    /// Recall a stored scene.
    ///
    /// `PUT /scenes/recall/{id}`. The endpoint has no response contract
    /// beyond the HTTP status.
    pub async fn recall_scene(&self, scene_id: &str) -> Result<(), Error> {
        debug!(scene_id, "recalling scene");
        let _: Value = self
            .put(&format!("scenes/recall/{scene_id}"), &json!({}), None)
            .await?;
        Ok(())
    }

    /// `GET /gateways`
    pub async fn list_gateways(&self) -> Result<Vec<GatewayRecord>, Error> {
        debug!("listing gateways");
        let gateways: OneOrMany<GatewayRecord> = self.get("gateways", None).await?;
        Ok(gateways.into())
    }

    /// Ask the cloud to ping a gateway and return its raw answer.
    ///
    /// `GET /gateway/ping/{id}`
    pub async fn ping_gateway(&self, gateway_id: &str) -> Result<Value, Error> {
        debug!(gateway_id, "pinging gateway");
        self.get(&format!("gateway/ping/{gateway_id}"), None).await
    }
}
