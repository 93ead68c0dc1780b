//! Shared helpers for command handlers.

use connect_mesh_core::{CommandOptions, Group, MeshApi};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Command options with the HTTP budget taken from `--timeout` when given.
pub fn command_options(global: &GlobalOpts) -> CommandOptions {
    let mut opts = CommandOptions::default();
    if let Some(secs) = global.timeout {
        // The mesh gets one second less than the HTTP request.
        opts.timeout_ms = secs.saturating_sub(1).max(1) * 1000;
    }
    opts
}

/// Find a group by ID (case-insensitive, as the API lowercases them).
pub async fn resolve_group(api: &MeshApi, identifier: &str) -> Result<Group, CliError> {
    api.list_groups()
        .await?
        .into_iter()
        .find(|g| g.id().eq_ignore_ascii_case(identifier))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "group".into(),
            identifier: identifier.into(),
            list_command: "groups list".into(),
        })
}

/// `"-"` for missing values in detail views.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}
