// Wire types for the médico backend.
//
// Field names follow the backend's camelCase JSON. Everything except `id`
// is defaulted so partially-populated records still decode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Record identifier as sent by the backend.
///
/// Numeric in practice, but string ids are accepted so the client does not
/// depend on the backend's storage choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Médico as returned by `GET /medico`, `GET /medico/{id}` and
/// `POST /medico/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicoResponse {
    pub id: Id,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub crm: Option<String>,
    #[serde(default)]
    pub especialidade: Option<String>,
    /// Absent on the single-record endpoint.
    #[serde(default)]
    pub clinicas: Option<Vec<ClinicaResponse>>,
}

/// Clínica as returned by the clínica endpoints and nested in médicos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicaResponse {
    pub id: Id,
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub cnpj: Option<String>,
}

/// Body of `POST /medico/create` and `PUT /medico/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicoRequest {
    pub nome: String,
    pub crm: String,
    pub especialidade: String,
}

/// Body of the clínica create/update endpoints. Always a full-field payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicaRequest {
    pub razao_social: String,
    pub cep: String,
    pub cnpj: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn medico_without_clinicas_decodes() {
        let m: MedicoResponse =
            serde_json::from_value(json!({"id": 3, "nome": "Ana", "crm": "123"})).unwrap();
        assert_eq!(m.id, Id::Number(3));
        assert_eq!(m.especialidade, None);
        assert_eq!(m.clinicas, None);
    }

    #[test]
    fn clinica_uses_camel_case() {
        let c: ClinicaResponse = serde_json::from_value(
            json!({"id": "c-1", "razaoSocial": "Clin A", "cep": "00000", "cnpj": "11"}),
        )
        .unwrap();
        assert_eq!(c.id.to_string(), "c-1");
        assert_eq!(c.razao_social.as_deref(), Some("Clin A"));

        let body = serde_json::to_value(ClinicaRequest {
            razao_social: "X".into(),
            cep: "1".into(),
            cnpj: "2".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"razaoSocial": "X", "cep": "1", "cnpj": "2"}));
    }
}
