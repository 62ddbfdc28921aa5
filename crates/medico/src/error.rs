//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use medico_config::ConfigError;
use medico_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the backend at {url}")]
    #[diagnostic(
        code(medico::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Try: medico medicos list --api-url http://localhost:8080"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(medico::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(medico::auth_failed),
        help(
            "The backend rejected the bearer token.\n\
             Store a new one with: medico config set-token\n\
             Or set the MEDICO_TOKEN environment variable."
        )
    )]
    AuthFailed { message: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Erro HTTP: {status}. {message}")]
    #[diagnostic(code(medico::http))]
    Http { status: u16, message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(medico::not_found),
        help("Run: medico {list_command} to see available ids")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(medico::clinica_step_failed),
        help(
            "The médico was created (id: {medico_id}) but its clínica was not.\n\
             Retry with: medico clinicas create {medico_id} --razao-social ..."
        )
    )]
    ClinicaStepFailed { medico_id: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(medico::operation_failed))]
    OperationFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(medico::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(medico::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: medico config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(medico::no_config),
        help(
            "Create a profile with: medico config init\n\
             Or pass --api-url / set MEDICO_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(medico::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(medico::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::Http { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Http { status: 403, .. } => exit_code::PERMISSION,
            Self::Http { status: 409, .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },

            unauthorized @ CoreError::Unauthorized { .. } => Self::AuthFailed {
                message: unauthorized.to_string(),
            },

            CoreError::Http { status, message } => Self::Http { status, message },

            CoreError::NotFound { entity, identifier } => Self::NotFound {
                list_command: if entity == "Clínica" {
                    "clinicas list <medico-id>".into()
                } else {
                    "medicos list".into()
                },
                resource_type: entity.into(),
                identifier,
            },

            CoreError::ClinicaStepFailed { medico_id, message } => {
                Self::ClinicaStepFailed { medico_id, message }
            }

            CoreError::Validation { field, reason } => Self::Validation {
                field: field.into(),
                reason,
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            other @ (CoreError::Busy | CoreError::Internal(_)) => Self::OperationFailed {
                message: other.display_message(),
            },
        }
    }
}
