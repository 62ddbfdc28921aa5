// medico-api: Async Rust client for the médico/clínica REST backend

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::Credentials;
pub use client::MedicoClient;
pub use error::{Error, ErrorField, extract_message};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport, TlsMode, TransportConfig,
};
pub use types::{ClinicaRequest, ClinicaResponse, Id, MedicoRequest, MedicoResponse};
