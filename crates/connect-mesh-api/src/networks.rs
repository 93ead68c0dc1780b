// Network endpoints

use std::time::Duration;

use tracing::debug;

use crate::client::MeshClient;
use crate::error::Error;
use crate::models::{NetworkRecord, OneOrMany};

/// Listing networks is slow on accounts with many meshes.
const LIST_NETWORKS_TIMEOUT: Duration = Duration::from_secs(60);

impl MeshClient {
    /// List all networks the token can access.
    ///
    /// `GET /networks`
    pub async fn list_networks(&self) -> Result<Vec<NetworkRecord>, Error> {
        debug!("listing networks");
        let networks: OneOrMany<NetworkRecord> =
            self.get("networks", Some(LIST_NETWORKS_TIMEOUT)).await?;
        Ok(networks.into())
    }

    /// Fetch one network including its mesh configuration sub-document.
    ///
    /// `GET /networks/{id}`
    pub async fn get_network(&self, network_id: &str) -> Result<NetworkRecord, Error> {
        debug!(network_id, "fetching network details");
        self.get(&format!("networks/{network_id}"), None).await
    }
}
