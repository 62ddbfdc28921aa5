use serde::{Deserialize, Serialize};

use super::Identifier;
use crate::error::CoreError;

/// Placeholder shown in the clínicas column when a médico has none.
pub const NO_CLINICAS: &str = "\u{2014}";

/// A médico with its owned, insertion-ordered clínicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medico {
    pub id: Identifier,
    pub nome: String,
    pub crm: String,
    pub especialidade: String,
    pub clinicas: Vec<Clinica>,
}

impl Medico {
    /// `razaoSocial` values joined with `", "`, or an em-dash placeholder.
    pub fn clinicas_summary(&self) -> String {
        if self.clinicas.is_empty() {
            NO_CLINICAS.to_owned()
        } else {
            self.clinicas
                .iter()
                .map(|c| c.razao_social.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    pub fn clinica(&self, id: &Identifier) -> Option<&Clinica> {
        self.clinicas.iter().find(|c| &c.id == id)
    }

    pub fn fields(&self) -> MedicoFields {
        MedicoFields {
            nome: self.nome.clone(),
            crm: self.crm.clone(),
            especialidade: self.especialidade.clone(),
        }
    }
}

/// A clínica. Has no lifecycle outside its médico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinica {
    pub id: Identifier,
    pub razao_social: String,
    pub cep: String,
    pub cnpj: String,
}

impl Clinica {
    pub fn fields(&self) -> ClinicaFields {
        ClinicaFields {
            razao_social: self.razao_social.clone(),
            cep: self.cep.clone(),
            cnpj: self.cnpj.clone(),
        }
    }
}

/// Editable médico fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicoFields {
    pub nome: String,
    pub crm: String,
    pub especialidade: String,
}

impl MedicoFields {
    /// All three fields are required.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("nome", &self.nome),
            ("crm", &self.crm),
            ("especialidade", &self.especialidade),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation {
                    field,
                    reason: "não pode ficar em branco".into(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn to_request(&self) -> medico_api::MedicoRequest {
        medico_api::MedicoRequest {
            nome: self.nome.clone(),
            crm: self.crm.clone(),
            especialidade: self.especialidade.clone(),
        }
    }
}

/// Editable clínica fields. Sent as typed, without validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicaFields {
    pub razao_social: String,
    pub cep: String,
    pub cnpj: String,
}

impl ClinicaFields {
    /// `true` when every field is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        [&self.razao_social, &self.cep, &self.cnpj]
            .iter()
            .all(|v| v.trim().is_empty())
    }

    pub(crate) fn to_request(&self) -> medico_api::ClinicaRequest {
        medico_api::ClinicaRequest {
            razao_social: self.razao_social.clone(),
            cep: self.cep.clone(),
            cnpj: self.cnpj.clone(),
        }
    }
}
