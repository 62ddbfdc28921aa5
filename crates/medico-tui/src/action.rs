//! All UI actions. Actions are the only way state changes.
//!
//! Screens emit request actions; the app runs the request on a spawned
//! task and feeds the result back as a completion action.

use std::fmt;

use medico_core::{
    CONFIRM_PROMPT, Clinica, ClinicaMutation, CoreError, CreateMedicoForm, CreateOutcome,
    Identifier, Medico, MedicoFields, Notice, Route,
};

#[derive(Debug)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──
    Navigate(Route),
    ToggleHelp,

    // ── Requests ──
    LoadMedicos,
    SubmitClinica(ClinicaMutation),
    RequestDelete { id: Identifier, nome: String },
    ConfirmYes,
    ConfirmNo,
    CreateMedico(Box<CreateMedicoForm>),
    UpdateMedico { id: Identifier, fields: MedicoFields },

    // ── Completions ──
    /// `generation` ties the result to the load that produced it.
    MedicosLoaded {
        generation: u64,
        result: Result<Vec<Medico>, CoreError>,
    },
    MedicoLoaded(Identifier, Result<Medico, CoreError>),
    ClinicaCompleted(ClinicaMutation, Result<Clinica, CoreError>),
    MedicoDeleted(Identifier, Result<(), CoreError>),
    MedicoCreated(Box<CreateMedicoForm>, Result<CreateOutcome, CoreError>),
    MedicoUpdated(Identifier, Result<(), CoreError>),

    // ── Notices ──
    Notify(Notice),
    DismissNotice,
}

/// An action waiting on a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteMedico { id: Identifier, nome: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteMedico { nome, .. } => write!(f, "{CONFIRM_PROMPT} ({nome})"),
        }
    }
}
