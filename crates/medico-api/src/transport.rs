// Transport seam between the REST client and the HTTP stack.
//
// `MedicoClient` only ever talks to an `HttpTransport`. The production
// implementation wraps reqwest and attaches the bearer token; tests and
// embedders can plug in anything that turns an `ApiRequest` into an
// `ApiResponse`.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap};
use tracing::trace;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;

// ── Request / response ───────────────────────────────────────────────

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// A fully-resolved request, independent of any HTTP library.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// JSON body, sent with `Content-Type: application/json` when present.
    pub body: Option<serde_json::Value>,
}

/// Raw response: status code plus the body as text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one authenticated request.
///
/// Implementations attach credentials and return whatever the server
/// answered, including non-2xx responses. Only transport failures are
/// reported as `Err`.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse, Error>> + Send;
}

// ── Transport configuration ──────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-signed development backends).
    DangerAcceptInvalid,
}

/// Settings for building the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("medico/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` with the given default headers.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── reqwest implementation ───────────────────────────────────────────

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport that sends `credentials` on every request.
    pub fn new(credentials: &Credentials, config: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(value) = credentials.header_value()? {
            headers.insert(AUTHORIZATION, value);
        }
        let http = config.build_client(headers)?;
        Ok(Self {
            http,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            timeout: TransportConfig::default().timeout,
        }
    }

    fn map_error(&self, url: &Url, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            Error::Connect {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        let ApiRequest { method, url, body } = request;
        let builder = match method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => self.http.post(url.clone()),
            Method::Put => self.http.put(url.clone()),
            Method::Delete => self.http.delete(url.clone()),
        };
        let builder = match body {
            Some(ref json) => builder.json(json),
            None => builder,
        };

        let resp = builder.send().await.map_err(|e| self.map_error(&url, &e))?;
        let status = resp.status().as_u16();
        trace!(%method, %url, status, "response");

        let body = resp.text().await.map_err(|e| self.map_error(&url, &e))?;
        Ok(ApiResponse { status, body })
    }
}
