// ── Clinic panel ──
//
// Per-médico state machine for viewing, editing and creating clínicas.
// Exists only while its médico is expanded; dropping it discards every
// buffer. Committed results leave through the store command channel.

use medico_api::HttpTransport;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::StoreCommand;
use crate::error::CoreError;
use crate::model::{Clinica, ClinicaFields, Identifier};

/// Which mutation the panel has in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update,
    Create,
}

/// Values being edited for one clínica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub clinica_id: Identifier,
    pub fields: ClinicaFields,
}

/// A prepared clínica request, detached from the panel so it can be run
/// on another task.
///
/// `panel` is the epoch of the panel that issued it. A result only
/// completes that panel, never a later one for the same médico.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClinicaMutation {
    Update {
        panel: u64,
        medico_id: Identifier,
        clinica_id: Identifier,
        fields: ClinicaFields,
    },
    Create {
        panel: u64,
        medico_id: Identifier,
        fields: ClinicaFields,
    },
}

impl ClinicaMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Update { .. } => MutationKind::Update,
            Self::Create { .. } => MutationKind::Create,
        }
    }

    pub fn medico_id(&self) -> &Identifier {
        match self {
            Self::Update { medico_id, .. } | Self::Create { medico_id, .. } => medico_id,
        }
    }

    /// Epoch of the issuing panel.
    pub fn panel(&self) -> u64 {
        match self {
            Self::Update { panel, .. } | Self::Create { panel, .. } => *panel,
        }
    }

    /// Perform the request.
    pub async fn execute<T: HttpTransport>(
        &self,
        client: &medico_api::MedicoClient<T>,
    ) -> Result<Clinica, CoreError> {
        let wire = match self {
            Self::Update {
                medico_id,
                clinica_id,
                fields,
                ..
            } => {
                client
                    .update_clinica(medico_id, clinica_id, &fields.to_request())
                    .await?
            }
            Self::Create { medico_id, fields, .. } => {
                client.create_clinica(medico_id, &fields.to_request()).await?
            }
        };
        Ok(Clinica::from(wire))
    }
}

/// Inline clínica editor bound to one médico.
#[derive(Debug)]
pub struct ClinicPanel {
    medico_id: Identifier,
    /// Distinguishes this panel from earlier ones for the same médico.
    epoch: u64,
    editing: Option<EditBuffer>,
    /// `Some` while the create form is visible.
    create_form: Option<ClinicaFields>,
    in_flight: Option<MutationKind>,
    commands: mpsc::UnboundedSender<StoreCommand>,
}

impl ClinicPanel {
    pub fn new(
        medico_id: Identifier,
        epoch: u64,
        commands: mpsc::UnboundedSender<StoreCommand>,
    ) -> Self {
        Self {
            medico_id,
            epoch,
            editing: None,
            create_form: None,
            in_flight: None,
            commands,
        }
    }

    pub fn medico_id(&self) -> &Identifier {
        &self.medico_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether `mutation` was issued by this panel and is the one in flight.
    pub fn owns(&self, mutation: &ClinicaMutation) -> bool {
        mutation.panel() == self.epoch
            && mutation.medico_id() == &self.medico_id
            && self.in_flight == Some(mutation.kind())
    }

    pub fn editing(&self) -> Option<&EditBuffer> {
        self.editing.as_ref()
    }

    pub fn edit_fields_mut(&mut self) -> Option<&mut ClinicaFields> {
        self.editing.as_mut().map(|b| &mut b.fields)
    }

    pub fn is_creating(&self) -> bool {
        self.create_form.is_some()
    }

    pub fn create_form(&self) -> Option<&ClinicaFields> {
        self.create_form.as_ref()
    }

    pub fn create_form_mut(&mut self) -> Option<&mut ClinicaFields> {
        self.create_form.as_mut()
    }

    pub fn in_flight(&self) -> Option<MutationKind> {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn ensure_idle(&self) -> Result<(), CoreError> {
        if self.is_busy() {
            Err(CoreError::Busy)
        } else {
            Ok(())
        }
    }

    // ── Edit ─────────────────────────────────────────────────────────

    /// Load `clinica`'s current values into the edit buffer, replacing any
    /// buffer for another clínica.
    pub fn begin_edit(&mut self, clinica: &Clinica) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.editing = Some(EditBuffer {
            clinica_id: clinica.id.clone(),
            fields: clinica.fields(),
        });
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.editing = None;
        Ok(())
    }

    /// Claim the in-flight slot for saving the buffer of `clinica_id`.
    pub fn prepare_save(&mut self, clinica_id: &Identifier) -> Result<ClinicaMutation, CoreError> {
        self.ensure_idle()?;
        let buffer = self
            .editing
            .as_ref()
            .filter(|b| &b.clinica_id == clinica_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Clínica em edição",
                identifier: clinica_id.to_string(),
            })?;
        let mutation = ClinicaMutation::Update {
            panel: self.epoch,
            medico_id: self.medico_id.clone(),
            clinica_id: buffer.clinica_id.clone(),
            fields: buffer.fields.clone(),
        };
        self.in_flight = Some(MutationKind::Update);
        Ok(mutation)
    }

    /// Send the edit buffer for `clinica_id` as a full-field update.
    pub async fn save<T: HttpTransport>(
        &mut self,
        client: &medico_api::MedicoClient<T>,
        clinica_id: &Identifier,
    ) -> Result<Clinica, CoreError> {
        let mutation = self.prepare_save(clinica_id)?;
        let result = mutation.execute(client).await;
        self.complete(result)
    }

    // ── Create ───────────────────────────────────────────────────────

    pub fn begin_create(&mut self) -> Result<(), CoreError> {
        self.ensure_idle()?;
        if self.create_form.is_none() {
            self.create_form = Some(ClinicaFields::default());
        }
        Ok(())
    }

    /// Hide the create form, discarding typed values.
    pub fn cancel_create(&mut self) -> Result<(), CoreError> {
        self.ensure_idle()?;
        self.create_form = None;
        Ok(())
    }

    pub fn prepare_create(&mut self) -> Result<ClinicaMutation, CoreError> {
        self.ensure_idle()?;
        let fields = self.create_form.clone().ok_or_else(|| CoreError::NotFound {
            entity: "Formulário de clínica",
            identifier: self.medico_id.to_string(),
        })?;
        self.in_flight = Some(MutationKind::Create);
        Ok(ClinicaMutation::Create {
            panel: self.epoch,
            medico_id: self.medico_id.clone(),
            fields,
        })
    }

    /// Send the create form as a new clínica for this médico.
    pub async fn create<T: HttpTransport>(
        &mut self,
        client: &medico_api::MedicoClient<T>,
    ) -> Result<Clinica, CoreError> {
        let mutation = self.prepare_create()?;
        let result = mutation.execute(client).await;
        self.complete(result)
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Release the in-flight slot and apply the outcome.
    ///
    /// Success clears the relevant buffer and emits the reconciliation
    /// command. Failure leaves every buffer as it was.
    pub fn complete(&mut self, result: Result<Clinica, CoreError>) -> Result<Clinica, CoreError> {
        let Some(kind) = self.in_flight.take() else {
            return Err(CoreError::Internal("no clínica request in flight".into()));
        };
        let clinica = match result {
            Ok(clinica) => clinica,
            Err(e) => {
                warn!(medico_id = %self.medico_id, ?kind, error = %e, "clínica request failed");
                return Err(e);
            }
        };

        match kind {
            MutationKind::Update => self.editing = None,
            MutationKind::Create => self.create_form = None,
        }
        info!(medico_id = %self.medico_id, clinica_id = %clinica.id, ?kind, "clínica committed");

        let command = StoreCommand::reconcile(
            self.medico_id.clone(),
            clinica.clone(),
            kind == MutationKind::Create,
        );
        if self.commands.send(command).is_err() {
            warn!("médico list dropped before clínica reconciliation");
        }
        Ok(clinica)
    }
}
