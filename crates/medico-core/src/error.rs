// ── Core error types ──
//
// User-facing errors from medico-core. The `From<medico_api::Error>` impl
// translates transport-layer errors into domain variants; everything else
// is raised by the state machines themselves.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    /// Non-2xx answer. Display mirrors the backend contract.
    #[error("Erro HTTP: {status}. {message}")]
    Http { status: u16, message: String },

    #[error("Erro HTTP: 401. {message}")]
    Unauthorized { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Campo obrigatório: {field} ({reason})")]
    Validation { field: &'static str, reason: String },

    /// A mutating request is already in flight for this unit.
    #[error("Operação em andamento, aguarde.")]
    Busy,

    #[error("{entity} não encontrado: {identifier}")]
    NotFound {
        entity: &'static str,
        identifier: String,
    },

    /// Second phase of the médico+clínica create failed; the médico exists.
    #[error("{message}")]
    ClinicaStepFailed { medico_id: String, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The single line handed to the notification surface.
    pub fn display_message(&self) -> String {
        match self {
            Self::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Http { status: 404, .. }
        )
    }

    /// Wrap a failed clínica request from the two-phase médico create.
    pub(crate) fn clinica_step(medico_id: impl Into<String>, err: &Self) -> Self {
        let message = match err {
            Self::Http { status, message } => {
                format!("Erro ao criar clínica: {status}. {message}")
            }
            Self::Unauthorized { message } => format!("Erro ao criar clínica: 401. {message}"),
            other => other.display_message(),
        };
        Self::ClinicaStepFailed {
            medico_id: medico_id.into(),
            message,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<medico_api::Error> for CoreError {
    fn from(err: medico_api::Error) -> Self {
        match err {
            medico_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            medico_api::Error::InvalidCredentials(message) => CoreError::Config { message },
            medico_api::Error::Http { status, message } => CoreError::Http { status, message },
            medico_api::Error::Connect { url, reason } => {
                CoreError::ConnectionFailed { url, reason }
            }
            medico_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            medico_api::Error::Transport(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason,
            },
            medico_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            medico_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            medico_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Resposta inválida do servidor: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_backend_text() {
        let err = CoreError::from(medico_api::Error::Http {
            status: 409,
            message: "CRM duplicado".into(),
        });
        assert_eq!(err.display_message(), "Erro HTTP: 409. CRM duplicado");
    }

    #[test]
    fn clinica_step_message() {
        let cause = CoreError::Http {
            status: 400,
            message: "CNPJ inválido".into(),
        };
        let err = CoreError::clinica_step("10", &cause);
        assert_eq!(
            err.display_message(),
            "Erro ao criar clínica: 400. CNPJ inválido"
        );
    }

    #[test]
    fn transport_failure_maps_to_connection() {
        let err = CoreError::from(medico_api::Error::Transport("reset".into()));
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    }
}
