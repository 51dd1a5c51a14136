//! HTTP transport seam
//!
//! The dispatcher only needs "send method + URL + query + body, get status and
//! body back". [`Transport`] captures that contract so the dispatcher can be
//! driven by [`HttpTransport`] in production and by a scripted mock in tests.

use crate::error::WapiError;
use crate::models::{HttpMethod, WapiRequest, WapiResponse};
use crate::session::Credentials;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout for [`HttpTransport`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static TLS_WARNING: Once = Once::new();

/// Transport operations used by the dispatcher
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP exchange. Non-2xx statuses are returned, not raised;
    /// only transport failures are errors.
    async fn send(&self, request: &WapiRequest) -> Result<WapiResponse, WapiError>;

    /// Whether TLS certificates are verified
    fn tls_verify(&self) -> bool;

    /// Turn TLS certificate verification on or off.
    ///
    /// Turning it off has a process-wide side effect: the insecure-connection
    /// warning is logged once, then suppressed for every client in the process.
    fn set_tls_verify(&mut self, value: bool) -> Result<(), WapiError>;
}

/// Log the insecure-connection warning once per process
pub fn disable_tls_warnings() {
    TLS_WARNING.call_once(|| {
        warn!("TLS certificate verification is disabled; further warnings are suppressed");
    });
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// reqwest-backed transport with basic auth
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    tls_verify: bool,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport
    ///
    /// # Arguments
    /// * `credentials` - Basic-auth username and password
    /// * `tls_verify` - Verify server certificates
    /// * `timeout` - Per-request timeout
    pub fn new(
        credentials: Credentials,
        tls_verify: bool,
        timeout: Duration,
    ) -> Result<Self, WapiError> {
        let client = build_client(tls_verify, timeout)?;
        if !tls_verify {
            disable_tls_warnings();
        }

        Ok(Self {
            client,
            credentials,
            tls_verify,
            timeout,
        })
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("credentials", &self.credentials)
            .field("tls_verify", &self.tls_verify)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn build_client(tls_verify: bool, timeout: Duration) -> Result<Client, WapiError> {
    let client = Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(!tls_verify)
        .build()?;
    Ok(client)
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &WapiRequest) -> Result<WapiResponse, WapiError> {
        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("{} {} -> {}", request.method, request.url, status);

        Ok(WapiResponse { status, body })
    }

    fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    fn set_tls_verify(&mut self, value: bool) -> Result<(), WapiError> {
        if value != self.tls_verify {
            self.client = build_client(value, self.timeout)?;
            self.tls_verify = value;
        }
        if !value {
            disable_tls_warnings();
        }
        Ok(())
    }
}
