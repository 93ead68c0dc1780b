//! Group command handlers.

use tabled::Tabled;

use connect_mesh_core::{Group, MeshApi, scale};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Devices")]
    devices: usize,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            id: g.id().to_owned(),
            name: g.name().to_owned(),
            network: g.network_id().to_owned(),
            devices: g.device_count(),
        }
    }
}

pub async fn handle(
    api: &MeshApi,
    args: GroupsArgs,
    network: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    match args.command {
        GroupsCommand::List => {
            let groups = match network {
                Some(id) => api.list_groups_for_network(id).await?,
                None => api.list_groups().await?,
            };
            let out = output::render_list(global.output, &groups, |x| GroupRow::from(x), |g| {
                g.id().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Power { group, state } => {
            let group = util::resolve_group(api, &group).await?;
            api.set_group_power(&group, state.is_on(), util::command_options(global))
                .await?;
            output::print_success(
                &format!(
                    "Group {} switched {}",
                    group.name(),
                    output::power_label(state.is_on(), false)
                ),
                color,
                global.quiet,
            );
            Ok(())
        }

        GroupsCommand::Brightness { group, value } => {
            let lightness = scale::brightness_to_api(value)?;
            let group = util::resolve_group(api, &group).await?;
            api.set_group_lightness(&group, lightness, util::command_options(global))
                .await?;
            output::print_success(
                &format!("Group {} brightness set to {value}", group.name()),
                color,
                global.quiet,
            );
            Ok(())
        }
    }
}
