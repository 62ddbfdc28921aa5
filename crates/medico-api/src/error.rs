use thiserror::Error;

/// Top-level error type for the `medico-api` crate.
///
/// Covers every failure mode of the REST surface: transport, non-2xx
/// responses, auth rejection, and body decoding. `medico-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend rejected the credentials (HTTP 401).
    #[error("Erro HTTP: 401. {message}")]
    Unauthorized { message: String },

    /// The configured token cannot be sent as a header value.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, reset, etc.
    #[error("Cannot connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Any other transport-level failure.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or handshake error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response. `message` is the backend's human-readable text,
    /// possibly empty.
    #[error("Erro HTTP: {status}. {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::InvalidCredentials(_))
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// HTTP status code, if the backend answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }
}

// ── Error message extraction ─────────────────────────────────────────

/// Which JSON key carries the human-readable message in an error body.
///
/// The médico endpoints answer `{"erro": "..."}` while the clínica
/// endpoints answer `{"message": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorField {
    Erro,
    Message,
}

impl ErrorField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Erro => "erro",
            Self::Message => "message",
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Erro => Self::Message,
            Self::Message => Self::Erro,
        }
    }
}

/// Pull the human-readable message out of a best-effort JSON error body.
///
/// Looks at the endpoint family's own key first, then the other family's
/// key. Non-JSON bodies, non-object bodies and non-string values yield `None`.
pub fn extract_message(body: &str, field: ErrorField) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    [field, field.other()]
        .into_iter()
        .find_map(|f| object.get(f.key()).and_then(|v| v.as_str()))
        .map(str::to_owned)
}
