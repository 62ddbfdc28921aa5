// ── Store mutation commands ──
//
// Children never touch the médico collection directly. They emit one of
// these over the list's command channel and the list's reducer
// (`MedicoStore::apply`) commits it.

use crate::model::{Clinica, Identifier, Medico};

/// A committed server-side change to reflect in the médico collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Wholesale replacement after a full-collection fetch.
    Replace(Vec<Medico>),
    /// Append a new clínica to the médico's sequence.
    ClinicaCreated { medico_id: Identifier, clinica: Clinica },
    /// Replace the clínica sharing `clinica.id` in place.
    ClinicaUpdated { medico_id: Identifier, clinica: Clinica },
    /// Drop a médico acknowledged as deleted by the server.
    MedicoRemoved(Identifier),
}

impl StoreCommand {
    /// Build the reconciliation command for a clínica mutation result.
    pub fn reconcile(medico_id: Identifier, clinica: Clinica, created: bool) -> Self {
        if created {
            Self::ClinicaCreated { medico_id, clinica }
        } else {
            Self::ClinicaUpdated { medico_id, clinica }
        }
    }
}
