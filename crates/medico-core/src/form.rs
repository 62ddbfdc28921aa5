// ── Médico forms ──
//
// Submit-once flows that end by navigating back to the list. The create
// form can also create one clínica for the new médico; that second step
// is not atomic with the first and is never rolled back.

use medico_api::{HttpTransport, MedicoClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::list::{LoadOutcome, fetch_medico};
use crate::model::{Clinica, ClinicaFields, Identifier, Medico, MedicoFields};
use crate::route::Route;

pub const LOADING_MEDICO: &str = "Carregando médico...";

// ── Create ───────────────────────────────────────────────────────────

/// What a successful create produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The created médico, when the backend echoed it back.
    pub medico: Option<Medico>,
    /// The clínica from the optional second step.
    pub clinica: Option<Clinica>,
    /// The clínica was requested but could not be attached because the
    /// backend did not say which médico it created.
    pub clinica_skipped: bool,
    pub next: Route,
}

/// "Novo Médico" form.
#[derive(Debug, Clone, Default)]
pub struct CreateMedicoForm {
    pub medico: MedicoFields,
    /// "Criar e vincular uma clínica a este médico".
    pub associate_clinica: bool,
    pub clinica: ClinicaFields,
    submitting: bool,
    /// Set once the médico exists server-side. `Some(None)` means the
    /// backend did not return it.
    committed: Option<Option<Medico>>,
}

impl CreateMedicoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The médico from a previous attempt whose clínica step failed.
    pub fn committed_medico(&self) -> Option<&Medico> {
        self.committed.as_ref().and_then(Option::as_ref)
    }

    /// Whether the clínica step will run on submit.
    pub fn wants_clinica(&self) -> bool {
        self.associate_clinica && !self.clinica.is_blank()
    }

    pub fn begin_submit(&mut self) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::Busy);
        }
        self.medico.validate()?;
        self.submitting = true;
        Ok(())
    }

    /// Create the médico, then the clínica if requested.
    ///
    /// When the clínica step fails the médico stays created; a retry skips
    /// straight to the clínica step. Without a médico id the clínica step
    /// cannot run at all, so it is reported as skipped instead.
    pub async fn submit<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
    ) -> Result<CreateOutcome, CoreError> {
        self.begin_submit()?;
        let result = self.run(client).await;
        self.submitting = false;
        result
    }

    async fn run<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
    ) -> Result<CreateOutcome, CoreError> {
        let medico = if let Some(existing) = &self.committed {
            debug!("médico already created, retrying clínica step");
            existing.clone()
        } else {
            let created = client
                .create_medico(&self.medico.to_request())
                .await?
                .map(Medico::from);
            info!(medico_id = ?created.as_ref().map(|m| m.id.to_string()), "médico created");
            self.committed = Some(created.clone());
            created
        };

        let mut clinica_skipped = false;
        let clinica = match medico.as_ref().map(|m| m.id.clone()) {
            Some(medico_id) if self.wants_clinica() => {
                Some(self.create_clinica(client, &medico_id).await?)
            }
            None if self.wants_clinica() => {
                warn!("médico created without an id, clínica step skipped");
                clinica_skipped = true;
                None
            }
            _ => None,
        };

        Ok(CreateOutcome {
            medico,
            clinica,
            clinica_skipped,
            next: Route::List,
        })
    }

    async fn create_clinica<T: HttpTransport>(
        &self,
        client: &MedicoClient<T>,
        medico_id: &Identifier,
    ) -> Result<Clinica, CoreError> {
        match client
            .create_clinica(medico_id, &self.clinica.to_request())
            .await
        {
            Ok(wire) => Ok(Clinica::from(wire)),
            Err(e) => {
                let err = CoreError::clinica_step(medico_id.to_string(), &CoreError::from(e));
                warn!(%medico_id, error = %err, "clínica step failed");
                Err(err)
            }
        }
    }
}

// ── Edit ─────────────────────────────────────────────────────────────

/// `PUT` the full field set of médico `id`.
pub async fn update_medico<T: HttpTransport>(
    client: &MedicoClient<T>,
    id: &Identifier,
    fields: &MedicoFields,
) -> Result<(), CoreError> {
    client
        .update_medico(id, &fields.to_request())
        .await
        .map_err(CoreError::from)
}

/// "Editar Médico" form bound to one id.
#[derive(Debug, Clone)]
pub struct EditMedicoForm {
    id: Identifier,
    pub fields: MedicoFields,
    loading: bool,
    submitting: bool,
}

impl EditMedicoForm {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            fields: MedicoFields::default(),
            loading: true,
            submitting: false,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Fill the fields from the fetched médico.
    pub fn finish_load(&mut self, result: Result<Medico, CoreError>) -> LoadOutcome<()> {
        self.loading = false;
        match result {
            Ok(medico) => {
                self.fields = medico.fields();
                LoadOutcome::Loaded(())
            }
            Err(e) => {
                warn!(medico_id = %self.id, error = %e, "failed to load médico");
                LoadOutcome::Failed(e)
            }
        }
    }

    /// GET the médico, racing `cancel`.
    pub async fn load<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
        cancel: &CancellationToken,
    ) -> LoadOutcome<()> {
        let was_loading = self.loading;
        self.begin_load();
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                self.loading = was_loading;
                debug!(medico_id = %self.id, "médico load cancelled");
                return LoadOutcome::Cancelled;
            }
            result = fetch_medico(client, &self.id) => result,
        };
        self.finish_load(result)
    }

    pub fn begin_submit(&mut self) -> Result<(), CoreError> {
        if self.submitting {
            return Err(CoreError::Busy);
        }
        self.fields.validate()?;
        self.submitting = true;
        Ok(())
    }

    pub fn finish_submit(&mut self, result: Result<(), CoreError>) -> Result<Route, CoreError> {
        self.submitting = false;
        result.map(|()| {
            info!(medico_id = %self.id, "médico updated");
            Route::List
        })
    }

    /// PUT the fields and return to the list on success.
    pub async fn submit<T: HttpTransport>(
        &mut self,
        client: &MedicoClient<T>,
    ) -> Result<Route, CoreError> {
        self.begin_submit()?;
        let result = update_medico(client, &self.id, &self.fields).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_blank_required_fields() {
        let mut form = CreateMedicoForm::new();
        form.medico.nome = "Ana".into();
        assert!(matches!(
            form.begin_submit(),
            Err(CoreError::Validation { field: "crm", .. })
        ));
        assert!(!form.is_submitting());
    }

    #[test]
    fn clinica_step_needs_opt_in_and_a_value() {
        let mut form = CreateMedicoForm::new();
        form.clinica.cep = "00000".into();
        assert!(!form.wants_clinica());
        form.associate_clinica = true;
        assert!(form.wants_clinica());
        form.clinica.cep = "   ".into();
        assert!(!form.wants_clinica());
    }

    #[test]
    fn edit_guard_and_navigation() {
        let mut form = EditMedicoForm::new(Identifier::Number(1));
        form.fields = MedicoFields {
            nome: "Ana".into(),
            crm: "1".into(),
            especialidade: "Cardio".into(),
        };
        form.begin_submit().unwrap();
        assert!(matches!(form.begin_submit(), Err(CoreError::Busy)));
        assert_eq!(form.finish_submit(Ok(())).unwrap(), Route::List);
        assert!(!form.is_submitting());
    }

    #[test]
    fn edit_load_fills_missing_fields_with_empty() {
        let mut form = EditMedicoForm::new(Identifier::Number(1));
        let outcome = form.finish_load(Ok(Medico {
            id: Identifier::Number(1),
            nome: "Ana".into(),
            crm: String::new(),
            especialidade: String::new(),
            clinicas: vec![],
        }));
        assert!(matches!(outcome, LoadOutcome::Loaded(())));
        assert_eq!(form.fields.nome, "Ana");
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn cancelled_load_keeps_loaded_fields() {
        let client = crate::config::ApiConfig::new("http://127.0.0.1:9".parse().unwrap())
            .connect()
            .unwrap();
        let mut form = EditMedicoForm::new(Identifier::Number(1));
        form.finish_load(Ok(Medico {
            id: Identifier::Number(1),
            nome: "Ana".into(),
            crm: "1".into(),
            especialidade: "Cardio".into(),
            clinicas: vec![],
        }));

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(matches!(
            form.load(&client, &cancel).await,
            LoadOutcome::Cancelled
        ));
        assert!(!form.is_loading());
        assert_eq!(form.fields.nome, "Ana");
    }
}
