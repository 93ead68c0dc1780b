//! Flag-aware configuration: layers CLI overrides on top of the shared
//! `connect-mesh-config` profiles and builds the core handles.

use std::time::Duration;

use secrecy::SecretString;

use connect_mesh_config::{self as shared, Config, Profile};
use connect_mesh_core::{MeshApi, MeshClient, SessionConfig, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The active profile after flag and config resolution.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub config: Config,
}

impl Resolved {
    /// Network from `--network`, else the profile's.
    pub fn network_id<'a>(&'a self, global: &'a GlobalOpts) -> Option<&'a str> {
        global.network.as_deref().or(self.profile.network_id.as_deref())
    }
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config
        .active_profile_name(global.profile.as_deref())
        .to_owned()
}

/// Load config and pick the active profile.
///
/// A missing profile is only an error when it was asked for by name; the
/// implicit default falls back to an empty profile so flags and env vars
/// alone are enough.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let config = shared::load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => Profile::default(),
    };

    Ok(Resolved {
        profile_name,
        profile,
        config,
    })
}

/// Resolve the API token: `--token` first, then the shared chain.
pub fn resolve_token(resolved: &Resolved, global: &GlobalOpts) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    Ok(shared::resolve_api_token(
        &resolved.profile,
        &resolved.profile_name,
    )?)
}

/// Transport settings with `--timeout` applied.
pub fn transport(resolved: &Resolved, global: &GlobalOpts) -> TransportConfig {
    let mut transport = shared::profile_to_transport(&resolved.profile, &resolved.config.defaults);
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }
    transport
}

/// Build an authenticated `MeshApi` for the active profile.
pub fn build_api(resolved: &Resolved, global: &GlobalOpts) -> Result<MeshApi, CliError> {
    let token = resolve_token(resolved, global)?;
    let client = MeshClient::new(&token, &transport(resolved, global))
        .map_err(connect_mesh_core::CoreError::from)?;
    Ok(MeshApi::new(client))
}

/// Session settings for `watch`, with `--network` / `--timeout` applied.
pub fn session_config(
    resolved: &Resolved,
    global: &GlobalOpts,
    scan_interval: Option<u64>,
) -> Result<SessionConfig, CliError> {
    let mut profile = resolved.profile.clone();
    if let Some(secs) = scan_interval {
        profile.scan_interval = secs;
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }
    Ok(shared::profile_to_session_config(
        &profile,
        &resolved.config.defaults,
        global.network.as_deref(),
    )?)
}
