//! Business logic between `medico-api` and the front ends (CLI / TUI).
//!
//! Every stateful unit here is a small state machine that performs no I/O
//! of its own: a `begin_*` / `prepare_*` step claims the unit, the front
//! end runs the request however it likes, and a `finish_*` / `complete`
//! step applies the result. Each unit also has an async driver that does
//! all three against a [`medico_api::MedicoClient`].
//!
//! - **[`MedicoList`]**: Owns the [`MedicoStore`], the single expansion
//!   selection and the current [`Notice`]. Loads are cancellable through a
//!   `CancellationToken` and report [`LoadOutcome::Cancelled`] silently.
//!
//! - **[`ClinicPanel`]**: Inline clínica editor for the expanded médico.
//!   One in-flight mutation at a time; committed results travel back to the
//!   list as [`StoreCommand`]s over an `mpsc` channel.
//!
//! - **[`MedicoDeletion`]**: Confirm-then-delete unit for one row.
//!
//! - **[`CreateMedicoForm`] / [`EditMedicoForm`]**: Submit-once forms.
//!
//! - **[`Route`]**: The navigable views.

pub mod command;
pub mod config;
pub mod convert;
pub mod deletion;
pub mod error;
pub mod form;
pub mod list;
pub mod model;
pub mod notice;
pub mod panel;
pub mod route;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::StoreCommand;
pub use config::{ApiConfig, Client, TlsVerification};
pub use deletion::{CONFIRM_PROMPT, Confirm, DeleteOutcome, MedicoDeletion};
pub use error::CoreError;
pub use form::{CreateMedicoForm, CreateOutcome, EditMedicoForm, update_medico};
pub use list::{LoadOutcome, MedicoList, fetch_medico, fetch_medicos};
pub use model::{Clinica, ClinicaFields, Identifier, Medico, MedicoFields};
pub use notice::{Notice, NoticeLevel};
pub use panel::{ClinicPanel, ClinicaMutation, EditBuffer, MutationKind};
pub use route::Route;
pub use store::MedicoStore;
