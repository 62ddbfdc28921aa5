// ── Record deletion ──
//
// One unit per médico row: confirm, DELETE, then tell the list to drop
// the record. The row stays until the server acknowledges.

use medico_api::{HttpTransport, MedicoClient};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::StoreCommand;
use crate::error::CoreError;
use crate::model::Identifier;

pub const CONFIRM_PROMPT: &str = "Confirma exclusão deste médico?";

/// Blocking yes/no prompt.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user said no; nothing was sent.
    Declined,
    /// The server acknowledged the deletion.
    Deleted(Identifier),
}

/// Deletion unit bound to one médico.
#[derive(Debug)]
pub struct MedicoDeletion {
    id: Identifier,
    in_flight: bool,
    commands: mpsc::UnboundedSender<StoreCommand>,
}

impl MedicoDeletion {
    pub fn new(id: Identifier, commands: mpsc::UnboundedSender<StoreCommand>) -> Self {
        Self {
            id,
            in_flight: false,
            commands,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn begin(&mut self) -> Result<(), CoreError> {
        if self.in_flight {
            return Err(CoreError::Busy);
        }
        self.in_flight = true;
        Ok(())
    }

    /// Release the in-flight flag; on success emit the removal command.
    pub fn finish(&mut self, result: Result<(), CoreError>) -> Result<DeleteOutcome, CoreError> {
        self.in_flight = false;
        match result {
            Ok(()) => {
                info!(medico_id = %self.id, "médico deleted");
                if self
                    .commands
                    .send(StoreCommand::MedicoRemoved(self.id.clone()))
                    .is_err()
                {
                    warn!("médico list dropped before removal");
                }
                Ok(DeleteOutcome::Deleted(self.id.clone()))
            }
            Err(e) => {
                warn!(medico_id = %self.id, error = %e, "delete failed");
                Err(e)
            }
        }
    }

    /// Prompt, then delete if confirmed.
    pub async fn run<T: HttpTransport, C: Confirm + ?Sized>(
        &mut self,
        client: &MedicoClient<T>,
        confirm: &C,
    ) -> Result<DeleteOutcome, CoreError> {
        if self.in_flight {
            return Err(CoreError::Busy);
        }
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }
        self.begin()?;
        let result = client.delete_medico(&self.id).await.map_err(CoreError::from);
        self.finish(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn success_emits_removal() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = MedicoDeletion::new(Identifier::Number(3), tx);
        d.begin().unwrap();
        assert!(matches!(d.begin(), Err(CoreError::Busy)));

        let outcome = d.finish(Ok(())).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted(Identifier::Number(3)));
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreCommand::MedicoRemoved(Identifier::Number(3))
        );
        assert!(!d.is_in_flight());
    }

    #[test]
    fn failure_emits_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = MedicoDeletion::new(Identifier::Number(3), tx);
        d.begin().unwrap();
        d.finish(Err(CoreError::Http {
            status: 500,
            message: String::new(),
        }))
        .unwrap_err();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closures_confirm() {
        let yes = |prompt: &str| prompt == CONFIRM_PROMPT;
        assert!(yes.confirm(CONFIRM_PROMPT));
    }
}
