//! Shared configuration for connect-mesh tools.
//!
//! TOML profiles, API token resolution (env + keyring + plaintext), and
//! translation to `connect_mesh_core::SessionConfig` / `TransportConfig`.
//! The CLI adds flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use connect_mesh_core::{SessionConfig, TransportConfig};

/// Keyring service name; entries are `{profile}/api-token`.
pub const KEYRING_SERVICE: &str = "connect-mesh";

/// Prefix for environment overrides, e.g. `CONNECT_MESH_DEFAULTS__TIMEOUT`.
pub const ENV_PREFIX: &str = "CONNECT_MESH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: `requested`, else `default_profile`, else "default".
    pub fn active_profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named account profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API token (plaintext, prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Network polled by `watch` and used to filter listings.
    pub network_id: Option<String>,

    /// Status poll period in seconds (10–300).
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,

    /// Seconds between device-detail checks.
    #[serde(default = "default_details_interval")]
    pub details_interval: u64,

    /// Seconds between new-device discovery runs.
    #[serde(default = "default_discovery_interval")]
    pub discovery_interval: u64,

    /// Override request timeout.
    pub timeout: Option<u64>,

    /// Path to an extra CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_token: None,
            api_token_env: None,
            network_id: None,
            scan_interval: default_scan_interval(),
            details_interval: default_details_interval(),
            discovery_interval: default_discovery_interval(),
            timeout: None,
            ca_cert: None,
        }
    }
}

fn default_scan_interval() -> u64 {
    30
}
fn default_details_interval() -> u64 {
    300
}
fn default_discovery_interval() -> u64 {
    900
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "connect-mesh", "connect-mesh").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("connect-mesh");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/api-token"),
    )?)
}

/// Resolve the API token from the credential chain (no CLI flag step).
pub fn resolve_api_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_token_env → env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store the API token in the system keyring for `profile_name`.
pub fn store_api_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

// ── Translation to core types ───────────────────────────────────────

/// HTTP transport settings for a profile.
pub fn profile_to_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    TransportConfig {
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        ca_cert: profile.ca_cert.clone(),
    }
}

/// Build a validated `SessionConfig` from a profile.
///
/// `network_override` wins over the profile's `network_id`.
pub fn profile_to_session_config(
    profile: &Profile,
    defaults: &Defaults,
    network_override: Option<&str>,
) -> Result<SessionConfig, ConfigError> {
    let network_id = network_override
        .map(str::to_owned)
        .or_else(|| profile.network_id.clone())
        .ok_or_else(|| ConfigError::Validation {
            field: "network_id".into(),
            reason: "no network configured; pass --network or set network_id".into(),
        })?;

    let mut session = SessionConfig::new(network_id)
        .with_scan_interval(Duration::from_secs(profile.scan_interval))
        .with_details_interval(Duration::from_secs(profile.details_interval))
        .with_discovery_interval(Duration::from_secs(profile.discovery_interval));
    session.request_timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    session.validate().map_err(|e| ConfigError::Validation {
        field: "profile".into(),
        reason: e.to_string(),
    })?;
    Ok(session)
}
