//! Gateway command handlers.

use tabled::Tabled;

use connect_mesh_core::{Gateway, MeshApi};

use crate::cli::{GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "Connected")]
    connected: String,
}

impl From<&Gateway> for GatewayRow {
    fn from(g: &Gateway) -> Self {
        Self {
            id: g.id.clone(),
            network: g.network_id.clone(),
            firmware: g.firmware.clone(),
            connected: if g.connected { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(
    api: &MeshApi,
    args: GatewaysArgs,
    network: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GatewaysCommand::List => {
            let mut gateways = api.list_gateways().await?;
            if let Some(id) = network {
                gateways.retain(|g| g.network_id.eq_ignore_ascii_case(id));
            }
            let out = output::render_list(global.output, &gateways, |x| GatewayRow::from(x), |g| {
                g.id.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Ping { gateway } => {
            let reply = api.ping_gateway(&gateway).await?;
            let out = output::render_single(
                global.output,
                &reply,
                |v| format!("{v:#}"),
                |_| gateway.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
