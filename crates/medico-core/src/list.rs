// ── Master list controller ──
//
// Owns the médico store, the single expansion selection (an optional
// `ClinicPanel`) and the current notice. Children report committed
// mutations through the command channel; `drain_commands` applies them.

use medico_api::{HttpTransport, MedicoClient};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::StoreCommand;
use crate::deletion::{Confirm, DeleteOutcome, MedicoDeletion};
use crate::error::CoreError;
use crate::model::{Clinica, Identifier, Medico};
use crate::notice::{self, Notice};
use crate::panel::{ClinicPanel, ClinicaMutation, MutationKind};
use crate::store::MedicoStore;

pub const EMPTY_LIST: &str = "Nenhum médico encontrado.";
pub const LOADING: &str = "Carregando médicos...";
pub const EMPTY_PANEL: &str = "Nenhuma clínica associada.";

/// Result of a cancellable load.
#[derive(Debug)]
pub enum LoadOutcome<T = usize> {
    /// Loaded successfully.
    Loaded(T),
    /// Failed; the error was also turned into a notice.
    Failed(CoreError),
    /// Cancelled before completion; no state was touched.
    Cancelled,
}

impl<T> LoadOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Fetch and convert the full médico collection.
pub async fn fetch_medicos<T: HttpTransport>(
    client: &MedicoClient<T>,
) -> Result<Vec<Medico>, CoreError> {
    let medicos = client.list_medicos().await?;
    Ok(medicos.into_iter().map(Medico::from).collect())
}

/// Fetch one médico by id.
pub async fn fetch_medico<T: HttpTransport>(
    client: &MedicoClient<T>,
    id: &Identifier,
) -> Result<Medico, CoreError> {
    Ok(Medico::from(client.get_medico(id).await?))
}

/// The médico list with its inline clínica panel.
#[derive(Debug)]
pub struct MedicoList {
    store: MedicoStore,
    expanded: Option<ClinicPanel>,
    loading: bool,
    notice: Option<Notice>,
    /// Epoch handed to the next panel.
    next_panel: u64,
    commands_tx: mpsc::UnboundedSender<StoreCommand>,
    commands_rx: mpsc::UnboundedReceiver<StoreCommand>,
}

impl Default for MedicoList {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicoList {
    pub fn new() -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        Self {
            store: MedicoStore::new(),
            expanded: None,
            loading: false,
            notice: None,
            next_panel: 0,
            commands_tx,
            commands_rx,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn store(&self) -> &MedicoStore {
        &self.store
    }

    pub fn medicos(&self) -> &[Medico] {
        self.store.all()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Sender half of the store command channel, for child units.
    pub fn commands(&self) -> mpsc::UnboundedSender<StoreCommand> {
        self.commands_tx.clone()
    }

    pub fn expanded_id(&self) -> Option<&Identifier> {
        self.expanded.as_ref().map(ClinicPanel::medico_id)
    }

    pub fn panel(&self) -> Option<&ClinicPanel> {
        self.expanded.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut ClinicPanel> {
        self.expanded.as_mut()
    }

    /// The médico whose panel is open.
    pub fn expanded_medico(&self) -> Option<&Medico> {
        self.expanded_id().and_then(|id| self.store.get(id))
    }

    // ── Load ─────────────────────────────────────────────────────────

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.notice = None;
    }

    /// Apply a finished fetch. Success replaces the store wholesale;
    /// failure empties it and raises one error notice.
    pub fn finish_load(&mut self, result: Result<Vec<Medico>, CoreError>) -> LoadOutcome {
        self.loading = false;
        match result {
            Ok(medicos) => {
                let count = medicos.len();
                if self
                    .expanded_id()
                    .is_some_and(|id| !medicos.iter().any(|m| &m.id == id))
                {
                    self.expanded = None;
                }
                self.store.apply(StoreCommand::Replace(medicos));
                info!(count, "médicos loaded");
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(error = %e, "failed to load médicos");
                self.store.clear();
                self.expanded = None;
                self.notice = Some(Notice::from(&e));
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Put the load flag and notice back after a cancelled load.
    pub fn cancel_load(&mut self, previous_notice: Option<Notice>) -> LoadOutcome {
        self.loading = false;
        self.notice = previous_notice;
        debug!("médico load cancelled");
        LoadOutcome::Cancelled
    }

    /// Fetch the full collection, racing `cancel`. A cancelled load leaves
    /// the list exactly as it was.
    pub async fn load<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
        cancel: &CancellationToken,
    ) -> LoadOutcome {
        let previous_notice = self.notice.clone();
        self.begin_load();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return self.cancel_load(previous_notice),
            result = fetch_medicos(client) => result,
        };
        self.finish_load(result)
    }

    // ── Expansion ────────────────────────────────────────────────────

    /// Expand `id`, or collapse it if already expanded. Expanding another
    /// médico replaces the current panel. Unknown ids are ignored.
    pub fn toggle_expand(&mut self, id: &Identifier) {
        if self.expanded_id() == Some(id) {
            self.expanded = None;
        } else if self.store.get(id).is_some() {
            let epoch = self.next_panel;
            self.next_panel += 1;
            self.expanded = Some(ClinicPanel::new(id.clone(), epoch, self.commands()));
        } else {
            debug!(medico_id = %id, "expand for unknown médico ignored");
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    // ── Reconciliation ───────────────────────────────────────────────

    pub fn reconcile(&mut self, medico_id: Identifier, clinica: Clinica, created: bool) -> bool {
        self.store
            .apply(StoreCommand::reconcile(medico_id, clinica, created))
    }

    pub fn remove_medico(&mut self, id: &Identifier) -> bool {
        if self.expanded_id() == Some(id) {
            self.expanded = None;
        }
        self.store.apply(StoreCommand::MedicoRemoved(id.clone()))
    }

    /// Apply every pending child command. Returns how many changed the store.
    pub fn drain_commands(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(command) = self.commands_rx.try_recv() {
            let changed_now = match command {
                StoreCommand::MedicoRemoved(id) => self.remove_medico(&id),
                other => self.store.apply(other),
            };
            if changed_now {
                changed += 1;
            }
        }
        changed
    }

    // ── Clínica panel drivers ────────────────────────────────────────

    fn panel_or_err(&mut self) -> Result<&mut ClinicPanel, CoreError> {
        self.expanded.as_mut().ok_or_else(|| CoreError::NotFound {
            entity: "Painel de clínicas",
            identifier: String::new(),
        })
    }

    /// Start editing a clínica of the expanded médico.
    pub fn begin_clinica_edit(&mut self, clinica_id: &Identifier) -> Result<(), CoreError> {
        let medico_id = self
            .expanded_id()
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Painel de clínicas",
                identifier: String::new(),
            })?;
        let clinica = self
            .store
            .get(&medico_id)
            .and_then(|m| m.clinica(clinica_id))
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "Clínica",
                identifier: clinica_id.to_string(),
            })?;
        self.panel_or_err()?.begin_edit(&clinica)
    }

    /// Route a finished clínica request back into the list.
    ///
    /// If the panel that issued it is still open it completes there.
    /// Otherwise (collapsed, or replaced by a newer panel for the same
    /// médico) a success is reconciled straight into the store and the
    /// open panel's buffers and in-flight slot are left alone.
    pub fn complete_clinica_mutation(
        &mut self,
        mutation: &ClinicaMutation,
        result: Result<Clinica, CoreError>,
    ) -> Result<Clinica, CoreError> {
        let kind = mutation.kind();
        let outcome = match self.expanded.as_mut() {
            Some(panel) if panel.owns(mutation) => panel.complete(result),
            _ => {
                if let Ok(clinica) = &result {
                    debug!(medico_id = %mutation.medico_id(), "reconciling after panel closed");
                    self.store.apply(StoreCommand::reconcile(
                        mutation.medico_id().clone(),
                        clinica.clone(),
                        kind == MutationKind::Create,
                    ));
                }
                result
            }
        };
        self.drain_commands();

        self.notice = Some(match &outcome {
            Ok(_) => Notice::success(match kind {
                MutationKind::Update => notice::CLINICA_ATUALIZADA,
                MutationKind::Create => notice::CLINICA_CRIADA,
            }),
            Err(e) => Notice::from(e),
        });
        outcome
    }

    /// Save the expanded panel's edit buffer for `clinica_id`.
    pub async fn save_clinica<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
        clinica_id: &Identifier,
    ) -> Result<Clinica, CoreError> {
        let mutation = self.panel_or_err()?.prepare_save(clinica_id)?;
        let result = mutation.execute(client).await;
        self.complete_clinica_mutation(&mutation, result)
    }

    /// Submit the expanded panel's create form.
    pub async fn create_clinica<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
    ) -> Result<Clinica, CoreError> {
        let mutation = self.panel_or_err()?.prepare_create()?;
        let result = mutation.execute(client).await;
        self.complete_clinica_mutation(&mutation, result)
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Start a deletion unit for one row.
    pub fn deletion(&self, id: &Identifier) -> MedicoDeletion {
        MedicoDeletion::new(id.clone(), self.commands())
    }

    /// Apply a finished deletion and raise the matching notice.
    pub fn finish_deletion(
        &mut self,
        result: Result<DeleteOutcome, CoreError>,
    ) -> Result<DeleteOutcome, CoreError> {
        self.drain_commands();
        match &result {
            Ok(DeleteOutcome::Deleted(_)) => {
                self.notice = Some(Notice::success(notice::MEDICO_EXCLUIDO));
            }
            Ok(DeleteOutcome::Declined) => {}
            Err(e) => self.notice = Some(Notice::from(e)),
        }
        result
    }

    /// Confirm, delete and remove one médico.
    pub async fn delete_medico<T: HttpTransport, C: Confirm + ?Sized>(
        &mut self,
        client: &MedicoClient<T>,
        id: &Identifier,
        confirm: &C,
    ) -> Result<DeleteOutcome, CoreError> {
        let mut deletion = self.deletion(id);
        let result = deletion.run(client, confirm).await;
        self.finish_deletion(result)
    }
}
