// ── Wire → domain conversion ──
//
// Missing string fields become empty strings and a missing `clinicas`
// array becomes an empty sequence.

use medico_api::{ClinicaResponse, MedicoResponse};

use crate::model::{Clinica, Medico};

impl From<MedicoResponse> for Medico {
    fn from(m: MedicoResponse) -> Self {
        Self {
            id: m.id.into(),
            nome: m.nome.unwrap_or_default(),
            crm: m.crm.unwrap_or_default(),
            especialidade: m.especialidade.unwrap_or_default(),
            clinicas: m
                .clinicas
                .unwrap_or_default()
                .into_iter()
                .map(Clinica::from)
                .collect(),
        }
    }
}

impl From<ClinicaResponse> for Clinica {
    fn from(c: ClinicaResponse) -> Self {
        Self {
            id: c.id.into(),
            razao_social: c.razao_social.unwrap_or_default(),
            cep: c.cep.unwrap_or_default(),
            cnpj: c.cnpj.unwrap_or_default(),
        }
    }
}
