//! Network command handlers.

use tabled::Tabled;

use connect_mesh_core::{MeshApi, Network};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mesh")]
    mesh: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Network> for NetworkRow {
    fn from(n: &Network) -> Self {
        Self {
            id: n.id().to_owned(),
            name: n.name().to_owned(),
            mesh: n
                .mesh()
                .map_or_else(|| "-".into(), |m| m.mesh_name.clone()),
            updated: n.update_date().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn detail(n: &Network) -> String {
    let mut lines = vec![
        format!("ID:       {}", n.id()),
        format!("Name:     {}", n.name()),
        format!("Created:  {}", n.creation_date().to_rfc3339()),
        format!("Updated:  {}", n.update_date().to_rfc3339()),
    ];
    match n.mesh() {
        Some(mesh) => {
            lines.push(format!("Mesh:     {} ({})", mesh.mesh_name, mesh.mesh_uuid));
            lines.push(format!("Net keys: {}", mesh.net_keys.len()));
            lines.push(format!("App keys: {}", mesh.app_keys.len()));
            lines.push(format!("Groups:   {}", mesh.groups.len()));
            for p in &mesh.provisioners {
                lines.push(format!("Provisioner: {}", p.provisioner_name));
            }
        }
        None => lines.push("Mesh:     -".into()),
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(api: &MeshApi, args: NetworksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List => {
            let networks = api.list_networks().await?;
            let out = output::render_list(global.output, &networks, |x| NetworkRow::from(x), |n| {
                n.id().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Get { network } => {
            let network = api.get_network(&network).await?;
            let out = output::render_single(global.output, &network, detail, |n| {
                n.id().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
