// ── Runtime connection configuration ──
//
// Describes how to reach the backend. Carries the token and connection
// tuning but never touches disk; `medico-config` builds it and front ends
// hand it in.

use std::path::PathBuf;
use std::time::Duration;

use medico_api::{Credentials, MedicoClient, ReqwestTransport, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Client type used by the CLI and TUI.
pub type Client = MedicoClient<ReqwestTransport>;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Everything needed to talk to one backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base API URL (e.g. `http://localhost:8080`).
    pub base_url: Url,
    /// Bearer token. `None` sends requests unauthenticated.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build an authenticated client for this backend.
    pub fn connect(&self) -> Result<Client, CoreError> {
        let transport_config = TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            ..TransportConfig::default()
        };
        let credentials = Credentials::from_token(self.token.clone());
        let transport = ReqwestTransport::new(&credentials, &transport_config)?;
        Ok(MedicoClient::new(self.base_url.as_str(), transport)?)
    }
}
