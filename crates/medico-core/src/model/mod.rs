// ── Domain model ──
//
// Canonical types handed to the CLI and TUI. Wire types from `medico-api`
// are converted into these in `crate::convert`.

pub mod identifier;
pub mod medico;

pub use identifier::Identifier;
pub use medico::{Clinica, ClinicaFields, Medico, MedicoFields, NO_CLINICAS};
