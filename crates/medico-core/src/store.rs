// ── Médico record store ──
//
// Insertion-ordered collection keyed by `id`. The only way to mutate it
// is `apply`, which never reorders existing entries.

use tracing::{debug, trace};

use crate::command::StoreCommand;
use crate::model::{Clinica, Identifier, Medico};

/// The médicos currently displayed, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicoStore {
    medicos: Vec<Medico>,
}

impl MedicoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Medico] {
        &self.medicos
    }

    pub fn get(&self, id: &Identifier) -> Option<&Medico> {
        self.medicos.iter().find(|m| &m.id == id)
    }

    pub fn position(&self, id: &Identifier) -> Option<usize> {
        self.medicos.iter().position(|m| &m.id == id)
    }

    pub fn len(&self) -> usize {
        self.medicos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medicos.is_empty()
    }

    pub fn clear(&mut self) {
        self.medicos.clear();
    }

    /// Apply one command. Returns `true` if the collection changed.
    ///
    /// Commands addressing an unknown médico (or, for updates, an unknown
    /// clínica) are no-ops.
    pub fn apply(&mut self, command: StoreCommand) -> bool {
        trace!(?command, "store apply");
        match command {
            StoreCommand::Replace(medicos) => {
                self.medicos = medicos;
                true
            }
            StoreCommand::ClinicaCreated { medico_id, clinica } => {
                self.with_medico(&medico_id, |m| {
                    m.clinicas.push(clinica);
                    true
                })
            }
            StoreCommand::ClinicaUpdated { medico_id, clinica } => {
                self.with_medico(&medico_id, |m| replace_clinica(&mut m.clinicas, clinica))
            }
            StoreCommand::MedicoRemoved(id) => {
                let before = self.medicos.len();
                self.medicos.retain(|m| m.id != id);
                before != self.medicos.len()
            }
        }
    }

    fn with_medico(&mut self, id: &Identifier, f: impl FnOnce(&mut Medico) -> bool) -> bool {
        if let Some(medico) = self.medicos.iter_mut().find(|m| &m.id == id) {
            f(medico)
        } else {
            debug!(medico_id = %id, "reconcile for unknown médico ignored");
            false
        }
    }
}

fn replace_clinica(clinicas: &mut [Clinica], updated: Clinica) -> bool {
    match clinicas.iter_mut().find(|c| c.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}
