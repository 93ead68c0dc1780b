// Group endpoints
//
// Group commands reuse the device command envelope, addressed by
// `groupId` + `networkId` instead of `uniqueId`.

use tracing::debug;

use crate::client::MeshClient;
use crate::error::Error;
use crate::models::{CommandBody, CommandOptions, CommandTarget, GroupRecord, OneOrMany, PowerState};

impl MeshClient {
    /// `GET /groups`
    pub async fn list_groups(&self) -> Result<Vec<GroupRecord>, Error> {
        debug!("listing groups");
        let groups: OneOrMany<GroupRecord> = self.get("groups", None).await?;
        Ok(groups.into())
    }

    /// `PUT /groups/power`
    pub async fn set_group_power(
        &self,
        group_id: &str,
        network_id: &str,
        on: bool,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        let power = PowerState::from(on);
        debug!(group_id, ?power, "setting group power");
        self.command(
            "groups/power",
            CommandTarget::Group {
                group_id,
                network_id,
            },
            &CommandBody::Power { power },
            opts,
        )
        .await
    }

    /// `PUT /groups/lightness`
    pub async fn set_group_lightness(
        &self,
        group_id: &str,
        network_id: &str,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        debug!(group_id, lightness, "setting group lightness");
        self.command(
            "groups/lightness",
            CommandTarget::Group {
                group_id,
                network_id,
            },
            &CommandBody::Lightness { lightness },
            opts,
        )
        .await
    }
}
