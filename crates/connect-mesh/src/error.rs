//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use connect_mesh_config::ConfigError;
use connect_mesh_core::{CoreError, RangeError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const API: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Connect Mesh cloud: {reason}")]
    #[diagnostic(
        code(connect_mesh::connection_failed),
        help("Check your internet connection, or retry with -vv to see each request.")
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    #[diagnostic(
        code(connect_mesh::timeout),
        help("Increase the timeout with --timeout or set `timeout` in your profile.")
    )]
    Timeout { timeout_ms: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(connect_mesh::auth_failed),
        help(
            "The API token was rejected or has expired.\n\
             Store a new one with: connect-mesh config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(connect_mesh::no_credentials),
        help(
            "Configure a token with: connect-mesh config init\n\
             Or set the CONNECT_MESH_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(connect_mesh::not_found),
        help("Run: connect-mesh {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Device {device} does not support {capability}")]
    #[diagnostic(
        code(connect_mesh::unsupported),
        help("Run: connect-mesh devices get {device} to see what it can do")
    )]
    Unsupported { device: String, capability: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("The mesh rejected the command: {code}")]
    #[diagnostic(
        code(connect_mesh::command_rejected),
        help("The device may be out of range of its gateway. Try again shortly.")
    )]
    CommandRejected { code: String },

    #[error("API error: {message}")]
    #[diagnostic(code(connect_mesh::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(connect_mesh::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(connect_mesh::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: connect-mesh config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No network selected")]
    #[diagnostic(
        code(connect_mesh::no_network),
        help(
            "Pass --network <ID> or set network_id in your profile.\n\
             Run: connect-mesh networks list"
        )
    )]
    NoNetwork,

    #[error(transparent)]
    #[diagnostic(code(connect_mesh::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Unsupported { .. } | Self::NoNetwork => {
                exit_code::USAGE
            }
            Self::ConnectionFailed { .. }
            | Self::Timeout { .. }
            | Self::CommandRejected { .. }
            | Self::ApiError { .. } => exit_code::API,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_ms } => CliError::Timeout { timeout_ms },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::NetworkNotFound { identifier } => CliError::NotFound {
                resource_type: "network".into(),
                identifier,
                list_command: "networks list".into(),
            },

            CoreError::UnknownDeviceType {
                device,
                device_type,
            } => CliError::Validation {
                field: "device type".into(),
                reason: format!("device {device} has unsupported type '{device_type}'"),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "response".into(),
                reason: message,
            },

            CoreError::UnsupportedCapability { device, capability } => CliError::Unsupported {
                device,
                capability: capability.into(),
            },

            CoreError::Range(e) => CliError::Validation {
                field: e.quantity.into(),
                reason: e.to_string(),
            },

            CoreError::CommandRejected { code } => CliError::CommandRejected { code },

            CoreError::Cancelled => CliError::ApiError {
                message: "operation cancelled".into(),
                status: None,
            },

            CoreError::Api {
                message, status, ..
            } => CliError::ApiError { message, status },
        }
    }
}

impl From<RangeError> for CliError {
    fn from(err: RangeError) -> Self {
        CoreError::Range(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, .. } if field == "network_id" => CliError::NoNetwork,
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "expired".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing: CliError = CoreError::DeviceNotFound {
            identifier: "x".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let busy: CliError = CoreError::Api {
            message: "busy".into(),
            status: Some(503),
            transient: true,
        }
        .into();
        assert_eq!(busy.exit_code(), exit_code::API);

        let unsupported: CliError = CoreError::UnsupportedCapability {
            device: "d".into(),
            capability: "HSL color",
        }
        .into();
        assert_eq!(unsupported.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn missing_network_is_a_usage_error() {
        let err: CliError = ConfigError::Validation {
            field: "network_id".into(),
            reason: "none".into(),
        }
        .into();
        assert!(matches!(err, CliError::NoNetwork), "got: {err:?}");
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
