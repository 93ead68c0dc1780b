// ── Core error types ──
//
// Domain-level errors from connect-mesh-core. The `From<connect_mesh_api::Error>`
// impl folds transport-layer failures into these variants while keeping the
// classification the poller needs (auth vs. transient vs. terminal).

use thiserror::Error;

use crate::scale::RangeError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach the Connect Mesh cloud: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Network not found: {identifier}")]
    NetworkNotFound { identifier: String },

    #[error("Unknown device type '{device_type}' for device {device}")]
    UnknownDeviceType { device: String, device_type: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Device {device} does not support {capability}")]
    UnsupportedCapability {
        device: String,
        capability: &'static str,
    },

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("Command rejected by the mesh: {code}")]
    CommandRejected { code: String },

    #[error("Operation cancelled")]
    Cancelled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
        /// Whether the request layer considered this worth retrying.
        transient: bool,
    },
}

impl CoreError {
    /// Returns `true` if the token was rejected and reauthentication is needed.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Returns `true` for failures that a later attempt might not repeat.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Api { transient, .. } => *transient,
            _ => false,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<connect_mesh_api::Error> for CoreError {
    fn from(err: connect_mesh_api::Error) -> Self {
        use connect_mesh_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            ApiError::TransientHttp { status, message } => CoreError::Api {
                message,
                status: Some(status),
                transient: true,
            },
            ApiError::TerminalHttp { status, message } => CoreError::Api {
                message,
                status: Some(status),
                transient: false,
            },
            ApiError::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            ApiError::InvalidUrl(e) => CoreError::ConnectionFailed {
                reason: format!("invalid URL: {e}"),
            },
            ApiError::Tls(reason) => CoreError::ConnectionFailed { reason },
            ApiError::Validation(message) => CoreError::ValidationFailed { message },
            ApiError::Deserialization { message, .. } => CoreError::ValidationFailed { message },
            ApiError::CommandFailed { code } => CoreError::CommandRejected { code },
        }
    }
}
