//! Command dispatch: bridges CLI args -> core API calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod devices;
pub mod gateways;
pub mod groups;
pub mod networks;
pub mod scenes;
pub mod util;
pub mod watch;

use connect_mesh_core::MeshApi;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    api: &MeshApi,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let network = resolved.network_id(global);
    match cmd {
        Command::Networks(args) => networks::handle(api, args, global).await,
        Command::Devices(args) => devices::handle(api, args, network, global).await,
        Command::Power { device, state } => control::power(api, &device, state, global).await,
        Command::Brightness { device, value } => {
            control::brightness(api, &device, value, global).await
        }
        Command::Temperature(args) => control::temperature(api, args, global).await,
        Command::Hsl {
            device,
            hue,
            saturation,
            lightness,
        } => control::hsl(api, &device, (hue, saturation, lightness), global).await,
        Command::Groups(args) => groups::handle(api, args, network, global).await,
        Command::Scenes(args) => scenes::handle(api, args, network, global).await,
        Command::Gateways(args) => gateways::handle(api, args, network, global).await,
        Command::Watch(args) => {
            let session = crate::config::session_config(resolved, global, args.scan_interval)?;
            watch::handle(api.clone(), session, args, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
