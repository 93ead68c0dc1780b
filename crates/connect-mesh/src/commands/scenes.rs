//! Scene command handlers.

use tabled::Tabled;

use connect_mesh_core::{MeshApi, Scene};

use crate::cli::{GlobalOpts, ScenesArgs, ScenesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SceneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Network")]
    network: String,
}

impl From<&Scene> for SceneRow {
    fn from(s: &Scene) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            network: s.network_id.clone(),
        }
    }
}

pub async fn handle(
    api: &MeshApi,
    args: ScenesArgs,
    network: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ScenesCommand::List => {
            let mut scenes = api.list_scenes().await?;
            if let Some(id) = network {
                scenes.retain(|s| s.network_id.eq_ignore_ascii_case(id));
            }
            let out =
                output::render_list(global.output, &scenes, |x| SceneRow::from(x), |s| s.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScenesCommand::Recall { scene } => {
            api.recall_scene(&scene).await?;
            output::print_success(
                &format!("Scene {scene} recalled"),
                output::should_color(global.color),
                global.quiet,
            );
            Ok(())
        }
    }
}
