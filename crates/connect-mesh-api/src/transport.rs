// Shared transport configuration for building reqwest::Client instances.
//
// The cloud API authenticates every call with a bearer token, so the
// token is baked into the client's default headers once at construction.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Upper bound enforced by reqwest itself. The request executor applies
    /// its own per-call budget on top of this.
    pub timeout: Duration,
    /// Extra PEM root certificate, for corporate TLS interception proxies.
    pub ca_cert: Option<PathBuf>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            ca_cert: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` that sends `Authorization: Bearer <token>`
    /// and `Content-Type: application/json` on every request.
    pub fn build_client(&self, token: &SecretString) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Validation("API token contains invalid header characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("connect-mesh/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if let Some(ref path) = self.ca_cert {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
