#![allow(clippy::unwrap_used)]
// Integration tests for `MedicoClient` over `ReqwestTransport` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medico_api::{
    ClinicaRequest, Credentials, Error, Id, MedicoClient, MedicoRequest, ReqwestTransport,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MedicoClient<ReqwestTransport>) {
    let server = MockServer::start().await;
    let creds = Credentials::Bearer(SecretString::from("test-token".to_string()));
    let transport = ReqwestTransport::new(&creds, &TransportConfig::default()).unwrap();
    let client = MedicoClient::new(&server.uri(), transport).unwrap();
    (server, client)
}

fn clinica_body() -> ClinicaRequest {
    ClinicaRequest {
        razao_social: "Clin A".into(),
        cep: "00000".into(),
        cnpj: "11".into(),
    }
}

// ── Médico tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_medicos_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/medico"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nome": "Ana", "crm": "123", "especialidade": "Cardio", "clinicas": []},
            {"id": 2, "nome": "Bruno", "crm": "456", "especialidade": "Orto",
             "clinicas": [{"id": 7, "razaoSocial": "Clin B", "cep": "1", "cnpj": "2"}]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let medicos = client.list_medicos().await.unwrap();
    assert_eq!(medicos.len(), 2);
    assert_eq!(medicos[0].nome.as_deref(), Some("Ana"));
    let clinicas = medicos[1].clinicas.as_ref().unwrap();
    assert_eq!(clinicas[0].id, Id::Number(7));
    assert_eq!(clinicas[0].razao_social.as_deref(), Some("Clin B"));
}

#[tokio::test]
async fn test_list_medicos_null_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client.list_medicos().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_medico_error_uses_erro_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/medico/42"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"erro": "Médico não encontrado"})),
        )
        .mount(&server)
        .await;

    let err = client.get_medico(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Erro HTTP: 404. Médico não encontrado");
}

#[tokio::test]
async fn test_create_medico_posts_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/medico/create"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"nome": "Ana", "crm": "123", "especialidade": "Cardio"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 10, "nome": "Ana", "crm": "123", "especialidade": "Cardio"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client
        .create_medico(&MedicoRequest {
            nome: "Ana".into(),
            crm: "123".into(),
            especialidade: "Cardio".into(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.id, Id::Number(10));
}

#[tokio::test]
async fn test_update_and_delete_medico_ignore_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/medico/3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/medico/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_medico(3, &MedicoRequest::default())
        .await
        .unwrap();
    client.delete_medico(3).await.unwrap();
}

#[tokio::test]
async fn test_delete_medico_failure() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/medico/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.delete_medico(1).await.unwrap_err();
    assert!(
        matches!(err, Error::Http { status: 500, ref message } if message.is_empty()),
        "expected Http 500, got: {err:?}"
    );
}

// ── Clínica tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_clinica() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/medico/1/clinica"))
        .and(body_json(json!({"razaoSocial": "Clin A", "cep": "00000", "cnpj": "11"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "razaoSocial": "Clin A", "cep": "00000", "cnpj": "11"
        })))
        .mount(&server)
        .await;

    let clinica = client.create_clinica(1, &clinica_body()).await.unwrap();
    assert_eq!(clinica.id, Id::Number(9));
    assert_eq!(clinica.cnpj.as_deref(), Some("11"));
}

#[tokio::test]
async fn test_update_clinica_error_uses_message_field() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/medico/1/clinica/9"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "CNPJ inválido"})),
        )
        .mount(&server)
        .await;

    let err = client.update_clinica(1, 9, &clinica_body()).await.unwrap_err();
    assert_eq!(err.to_string(), "Erro HTTP: 400. CNPJ inválido");
}

#[tokio::test]
async fn test_create_clinica_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/medico/1/clinica"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client.create_clinica(1, &clinica_body()).await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");
}

// ── Auth / transport tests ──────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"erro": "Token inválido"})))
        .mount(&server)
        .await;

    let err = client.list_medicos().await.unwrap_err();
    assert!(
        matches!(err, Error::Unauthorized { ref message } if message == "Token inválido"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_forbidden_is_plain_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client.list_medicos().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn test_connection_refused() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let transport = ReqwestTransport::new(&Credentials::Anonymous, &TransportConfig::default())
        .unwrap();
    let client = MedicoClient::new(&uri, transport).unwrap();

    let err = client.list_medicos().await.unwrap_err();
    assert!(
        matches!(err, Error::Connect { .. } | Error::Transport(_)),
        "got: {err:?}"
    );
}
