use thiserror::Error;

/// HTTP statuses the request layer treats as transient.
pub const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Top-level error type for the `connect-mesh-api` crate.
///
/// Every failure leaving the request layer is already classified:
/// [`RequestExecutor`](crate::RequestExecutor) consults
/// [`Error::is_retryable`] and nothing else when deciding whether to try again.
/// `connect-mesh-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The API rejected the bearer token (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── HTTP status ─────────────────────────────────────────────────
    /// Status in the transient set (408, 429, 500, 502, 503, 504).
    #[error("Transient HTTP error (HTTP {status}): {message}")]
    TransientHttp { status: u16, message: String },

    /// Any other non-success status.
    #[error("HTTP error (HTTP {status}): {message}")]
    TerminalHttp { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Request exceeded its wall-clock budget.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Payload was well-formed JSON but had the wrong shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Commands ────────────────────────────────────────────────────
    /// The API answered 2xx but did not report `success: true`.
    #[error("Command rejected by the mesh: {code}")]
    CommandFailed { code: String },
}

impl Error {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == 401 {
            Self::Authentication { message }
        } else if RETRYABLE_STATUSES.contains(&status) {
            Self::TransientHttp { status, message }
        } else {
            Self::TerminalHttp { status, message }
        }
    }

    /// Returns `true` if re-running the same request might succeed.
    ///
    /// Only timeouts and the transient status set qualify. Connection
    /// failures, auth failures and shape errors surface immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::TransientHttp { .. })
    }

    /// Returns `true` if the token was rejected and a new one is needed.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::TransientHttp { status, .. } | Self::TerminalHttp { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        for status in RETRYABLE_STATUSES {
            let err = Error::from_status(status, "boom");
            assert!(err.is_retryable(), "{status} should be retryable");
        }

        let err = Error::from_status(401, "bad token");
        assert!(err.is_auth_failure());
        assert!(!err.is_retryable());

        for status in [400, 403, 404, 409, 422, 501] {
            let err = Error::from_status(status, "nope");
            assert!(
                matches!(err, Error::TerminalHttp { .. }),
                "{status} should be terminal"
            );
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn timeout_is_retryable_validation_is_not() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(!Error::Validation("missing state".into()).is_retryable());
        assert!(
            !Error::CommandFailed {
                code: "TIMEOUT".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn not_found_detection() {
        assert!(Error::from_status(404, "gone").is_not_found());
        assert!(!Error::from_status(500, "oops").is_not_found());
    }
}
