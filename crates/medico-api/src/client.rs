// Async client for the médico/clínica REST backend.
//
// Base path: configurable (e.g. http://localhost:8080/)
// Auth: handled by the transport (Bearer token)

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, ErrorField, extract_message};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::types::{ClinicaRequest, ClinicaResponse, MedicoRequest, MedicoResponse};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the médico backend.
///
/// Generic over the transport so the request/response handling can be
/// exercised without a network stack.
#[derive(Debug, Clone)]
pub struct MedicoClient<T> {
    transport: T,
    base_url: Url,
}

impl<T: HttpTransport> MedicoClient<T> {
    /// Build a client rooted at `base_url`.
    ///
    /// The URL is normalized to end with `/` so relative joins keep any
    /// path prefix (e.g. `https://host/api` -> `https://host/api/medico`).
    pub fn new(base_url: &str, transport: T) -> Result<Self, Error> {
        let mut url = Url::parse(base_url)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(Self {
            transport,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Médicos ──────────────────────────────────────────────────────

    /// `GET /medico`. A `null` body is treated as an empty list.
    pub async fn list_medicos(&self) -> Result<Vec<MedicoResponse>, Error> {
        let list: Option<Vec<MedicoResponse>> = self.get("medico", ErrorField::Erro).await?;
        Ok(list.unwrap_or_default())
    }

    /// `GET /medico/{id}`.
    pub async fn get_medico(&self, id: impl fmt::Display) -> Result<MedicoResponse, Error> {
        self.get(&format!("medico/{id}"), ErrorField::Erro).await
    }

    /// `POST /medico/create`.
    ///
    /// The backend's success body is not guaranteed; an empty or
    /// undecodable body yields `Ok(None)` rather than an error.
    pub async fn create_medico(
        &self,
        body: &MedicoRequest,
    ) -> Result<Option<MedicoResponse>, Error> {
        let resp = self
            .send(Method::Post, "medico/create", Some(body), ErrorField::Erro)
            .await?;
        match serde_json::from_str(&resp.body) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                debug!(error = %e, "create_medico: success body not decodable");
                Ok(None)
            }
        }
    }

    /// `PUT /medico/{id}`. Response body is ignored.
    pub async fn update_medico(
        &self,
        id: impl fmt::Display,
        body: &MedicoRequest,
    ) -> Result<(), Error> {
        self.send(Method::Put, &format!("medico/{id}"), Some(body), ErrorField::Erro)
            .await
            .map(drop)
    }

    /// `DELETE /medico/{id}`.
    pub async fn delete_medico(&self, id: impl fmt::Display) -> Result<(), Error> {
        self.send::<()>(Method::Delete, &format!("medico/{id}"), None, ErrorField::Erro)
            .await
            .map(drop)
    }

    // ── Clínicas ─────────────────────────────────────────────────────

    /// `POST /medico/{id}/clinica`.
    pub async fn create_clinica(
        &self,
        medico_id: impl fmt::Display,
        body: &ClinicaRequest,
    ) -> Result<ClinicaResponse, Error> {
        self.post(&format!("medico/{medico_id}/clinica"), body, ErrorField::Message)
            .await
    }

    /// `PUT /medico/{id}/clinica/{clinicaId}`.
    pub async fn update_clinica(
        &self,
        medico_id: impl fmt::Display,
        clinica_id: impl fmt::Display,
        body: &ClinicaRequest,
    ) -> Result<ClinicaResponse, Error> {
        self.put(
            &format!("medico/{medico_id}/clinica/{clinica_id}"),
            body,
            ErrorField::Message,
        )
        .await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<R: DeserializeOwned>(&self, path: &str, field: ErrorField) -> Result<R, Error> {
        let resp = self.send::<()>(Method::Get, path, None, field).await?;
        decode(resp)
    }

    async fn post<R: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        field: ErrorField,
    ) -> Result<R, Error> {
        let resp = self.send(Method::Post, path, Some(body), field).await?;
        decode(resp)
    }

    async fn put<R: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        field: ErrorField,
    ) -> Result<R, Error> {
        let resp = self.send(Method::Put, path, Some(body), field).await?;
        decode(resp)
    }

    /// Send one request and turn non-2xx answers into errors.
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        field: ErrorField,
    ) -> Result<ApiResponse, Error> {
        let url = self.base_url.join(path)?;
        debug!("{method} {url}");

        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| Error::Transport(format!("failed to encode request body: {e}")))?;

        let resp = self.transport.send(ApiRequest { method, url, body }).await?;
        if resp.is_success() {
            Ok(resp)
        } else {
            Err(parse_error(&resp, field))
        }
    }
}

// ── Response handling ────────────────────────────────────────────────

fn decode<R: DeserializeOwned>(resp: ApiResponse) -> Result<R, Error> {
    serde_json::from_str(&resp.body).map_err(|e| {
        let preview: String = resp.body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: resp.body,
        }
    })
}

fn parse_error(resp: &ApiResponse, field: ErrorField) -> Error {
    let message = extract_message(&resp.body, field).unwrap_or_default();
    if resp.status == 401 {
        Error::Unauthorized { message }
    } else {
        Error::Http {
            status: resp.status,
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Replays a canned response and records the last request.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Option<ApiRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(None),
            }
        }

        fn last(&self) -> ApiRequest {
            self.seen.lock().unwrap().clone().unwrap()
        }
    }

    impl HttpTransport for Canned {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
            *self.seen.lock().unwrap() = Some(request);
            Ok(ApiResponse {
                status: self.status,
                body: self.body.to_owned(),
            })
        }
    }

    #[test]
    fn base_url_keeps_prefix() {
        let client = MedicoClient::new("http://host/api", Canned::new(200, "")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://host/api/");
    }

    #[tokio::test]
    async fn null_list_is_empty() {
        let client = MedicoClient::new("http://host", Canned::new(200, "null")).unwrap();
        assert!(client.list_medicos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clinica_update_targets_nested_path() {
        let client = MedicoClient::new(
            "http://host/",
            Canned::new(200, r#"{"id":9,"razaoSocial":"B","cep":"1","cnpj":"2"}"#),
        )
        .unwrap();
        let out = client
            .update_clinica(1, 9, &ClinicaRequest::default())
            .await
            .unwrap();
        assert_eq!(out.razao_social.as_deref(), Some("B"));

        let req = client.transport().last();
        assert_eq!(req.method, Method::Put);
        assert_eq!(req.url.path(), "/medico/1/clinica/9");
        assert!(req.body.is_some());
    }

    #[tokio::test]
    async fn create_medico_tolerates_empty_body() {
        let client = MedicoClient::new("http://host", Canned::new(201, "")).unwrap();
        let created = client
            .create_medico(&MedicoRequest::default())
            .await
            .unwrap();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn clinica_empty_body_is_deserialization_error() {
        let client = MedicoClient::new("http://host", Canned::new(200, "")).unwrap();
        let err = client
            .create_clinica(1, &ClinicaRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[tokio::test]
    async fn unauthorized_is_distinct() {
        let client = MedicoClient::new(
            "http://host",
            Canned::new(401, r#"{"erro":"token expirado"}"#),
        )
        .unwrap();
        let err = client.delete_medico(1).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Erro HTTP: 401. token expirado");
    }

    #[tokio::test]
    async fn delete_sends_no_body() {
        let client = MedicoClient::new("http://host", Canned::new(204, "")).unwrap();
        client.delete_medico("abc").await.unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, Method::Delete);
        assert!(req.body.is_none());
        assert_eq!(req.url.path(), "/medico/abc");
    }
}
