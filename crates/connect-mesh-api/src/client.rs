// Connect Mesh HTTP client
//
// Every call goes out as `{base}/{path}` through one `RequestExecutor`,
// which owns timeouts and retries. Non-2xx replies become classified
// `Error`s here. The per-resource calls live in `devices.rs`,
// `networks.rs`, `groups.rs` and `scenes.rs`.

use std::time::Duration;

use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{CommandBody, CommandOptions, CommandPayload, CommandResponse, CommandTarget};
use crate::rate_limit::RateLimiter;
use crate::retry::{RequestExecutor, RetryPolicy};
use crate::transport::TransportConfig;

/// Production API root.
pub const BASE_URL: &str = "https://cloud.connect-mesh.io/api/core";

const BODY_PREVIEW_LEN: usize = 200;

/// Raw client for the Connect Mesh cloud API.
///
/// Owns its [`RequestExecutor`] and [`RateLimiter`]; dropping the client
/// drops both. Methods return wire records from [`crate::models`].
#[derive(Debug)]
pub struct MeshClient {
    http: reqwest::Client,
    base_url: Url,
    executor: RequestExecutor,
    limiter: RateLimiter,
}

impl MeshClient {
    /// Create a client for the production API authenticated with `token`.
    pub fn new(token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(BASE_URL)?;
        let http = transport.build_client(token)?;
        Ok(Self::with_client(http, base_url).with_timeout(transport.timeout))
    }

    /// Create a client from a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the `Authorization` header. Used by
    /// tests pointing at a mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            executor: RequestExecutor::new(
                RetryPolicy::api_default(),
                crate::transport::DEFAULT_TIMEOUT,
            ),
            limiter: RateLimiter::new(),
        }
    }

    /// Replace the retry policy, keeping the default timeout.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.executor = RequestExecutor::new(policy, self.executor.default_timeout());
        self
    }

    /// Replace the default per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.executor = RequestExecutor::new(self.executor.policy().clone(), timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join an endpoint path onto the API root: `{base}/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and deserialize the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, Error> {
        let body = self.request(Method::GET, path, None, timeout).await?;
        parse_body(&body)
    }

    /// Send a PUT request with a JSON body and deserialize the response.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &(impl Serialize + Sync),
        timeout: Option<Duration>,
    ) -> Result<T, Error> {
        let payload = serde_json::to_value(payload).map_err(|e| Error::Validation(e.to_string()))?;
        let body = self
            .request(Method::PUT, path, Some(&payload), timeout)
            .await?;
        parse_body(&body)
    }

    /// Send a command and require an explicit `success: true` in the reply.
    pub(crate) async fn command(
        &self,
        path: &str,
        target: CommandTarget<'_>,
        body: &CommandBody,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        let payload = CommandPayload::new(target, body, opts);
        let response: Option<CommandResponse> =
            self.put(path, &payload, Some(opts.http_timeout())).await?;
        match response {
            Some(CommandResponse {
                success: Some(true),
                ..
            }) => Ok(()),
            Some(CommandResponse { error, .. }) => Err(Error::CommandFailed {
                code: error.unwrap_or_else(|| "UNKNOWN_ERROR".into()),
            }),
            None => Err(Error::CommandFailed {
                code: "UNKNOWN_ERROR".into(),
            }),
        }
    }

    /// Run one logical request through the executor and return the raw body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        let label = format!("{method} {path}");
        debug!("{} {}", method, url);

        self.executor
            .execute(&label, timeout, || {
                self.send_once(method.clone(), url.clone(), payload, timeout)
            })
            .await
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        payload: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<String, Error> {
        let mut builder = self.http.request(method, url);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(payload) = payload {
            builder = builder.json(payload);
        }

        let resp = builder.send().await.map_err(|e| map_reqwest(e, timeout))?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            trace!(status = status.as_u16(), body = preview(&body), "error response");
            return Err(Error::from_status(
                status.as_u16(),
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_owned()
                } else {
                    preview(&body).to_owned()
                },
            ));
        }

        resp.text().await.map_err(|e| map_reqwest(e, timeout))
    }
}

fn map_reqwest(err: reqwest::Error, timeout: Option<Duration>) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            timeout_ms: timeout
                .and_then(|t| u64::try_from(t.as_millis()).ok())
                .unwrap_or(0),
        }
    } else {
        Error::Transport(err)
    }
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(BODY_PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Deserialize a response body; an empty body reads as JSON `null`.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_joining_handles_slashes() {
        let client = MeshClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://cloud.connect-mesh.io/api/core/").unwrap(),
        );
        assert_eq!(
            client.url("/devices/abc/status").unwrap().as_str(),
            "https://cloud.connect-mesh.io/api/core/devices/abc/status"
        );
        assert_eq!(
            client.url("networks").unwrap().as_str(),
            "https://cloud.connect-mesh.io/api/core/networks"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "ä".repeat(300);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_LEN);
        assert_eq!(preview("short"), "short");
    }
}
