#![allow(clippy::unwrap_used)]
// End-to-end flows through the core state machines against a wiremock backend.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medico_core::{
    ApiConfig, Client, CoreError, CreateMedicoForm, DeleteOutcome, EditMedicoForm, Identifier,
    LoadOutcome, Medico, MedicoList, Notice, NoticeLevel, Route,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let config = ApiConfig::new(Url::parse(&server.uri()).unwrap());
    let client = config.connect().unwrap();
    (server, client)
}

async fn mount_ana(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nome": "Ana", "crm": "123", "especialidade": "Cardio", "clinicas": []}
        ])))
        .mount(server)
        .await;
}

async fn loaded_list(server: &MockServer, client: &Client) -> MedicoList {
    mount_ana(server).await;
    let mut list = MedicoList::new();
    let outcome = list.load(client, &CancellationToken::new()).await;
    assert!(matches!(outcome, LoadOutcome::Loaded(1)));
    list
}

fn row(m: &Medico) -> String {
    format!(
        "{} / {} / {} / {}",
        m.nome,
        m.crm,
        m.especialidade,
        m.clinicas_summary()
    )
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_renders_rows() {
    let (server, client) = setup().await;
    let list = loaded_list(&server, &client).await;

    let rows: Vec<String> = list.medicos().iter().map(row).collect();
    assert_eq!(rows, vec!["Ana / 123 / Cardio / \u{2014}".to_string()]);
    assert!(list.notice().is_none());
}

#[tokio::test]
async fn test_cancelled_load_touches_nothing() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut list = MedicoList::new();
    list.begin_load();
    list.finish_load(Ok(vec![Medico {
        id: Identifier::Number(1),
        nome: "Ana".into(),
        crm: "123".into(),
        especialidade: "Cardio".into(),
        clinicas: vec![],
    }]));
    list.set_notice(Notice::success("Clínica criada com sucesso."));

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = list.load(&client, &cancel).await;
    assert!(outcome.is_cancelled());
    assert!(!list.is_loading());
    assert_eq!(
        list.notice(),
        Some(&Notice::success("Clínica criada com sucesso."))
    );
    let rows: Vec<String> = list.medicos().iter().map(row).collect();
    assert_eq!(rows, vec!["Ana / 123 / Cardio / \u{2014}".to_string()]);
}

#[tokio::test]
async fn test_failed_load_shows_single_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"erro": "falha"})))
        .mount(&server)
        .await;

    let mut list = MedicoList::new();
    let outcome = list.load(&client, &CancellationToken::new()).await;
    assert!(matches!(outcome, LoadOutcome::Failed(CoreError::Http { status: 500, .. })));
    let notice = list.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Erro HTTP: 500. falha");
}

// ── Clinic panel ────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_clinica_appends_and_hides_form() {
    let (server, client) = setup().await;
    let mut list = loaded_list(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/medico/1/clinica"))
        .and(body_json(json!({"razaoSocial": "Clin A", "cep": "00000", "cnpj": "11"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9, "razaoSocial": "Clin A", "cep": "00000", "cnpj": "11"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let one = Identifier::Number(1);
    list.toggle_expand(&one);
    let panel = list.panel_mut().unwrap();
    panel.begin_create().unwrap();
    let form = panel.create_form_mut().unwrap();
    form.razao_social = "Clin A".into();
    form.cep = "00000".into();
    form.cnpj = "11".into();

    let created = list.create_clinica(&client).await.unwrap();
    assert_eq!(created.id, Identifier::Number(9));

    let medico = list.store().get(&one).unwrap();
    assert_eq!(medico.clinicas.len(), 1);
    assert_eq!(medico.clinicas[0].razao_social, "Clin A");
    let panel = list.panel().unwrap();
    assert!(!panel.is_creating());
    assert!(!panel.is_busy());
    assert_eq!(list.notice().unwrap().message, "Clínica criada com sucesso.");
}

#[tokio::test]
async fn test_create_clinica_empty_body_keeps_form() {
    let (server, client) = setup().await;
    let mut list = loaded_list(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/medico/1/clinica"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let one = Identifier::Number(1);
    list.toggle_expand(&one);
    let panel = list.panel_mut().unwrap();
    panel.begin_create().unwrap();
    panel.create_form_mut().unwrap().razao_social = "Clin A".into();

    let err = list.create_clinica(&client).await.unwrap_err();
    assert!(matches!(err, CoreError::Internal(_)), "got: {err:?}");

    let panel = list.panel().unwrap();
    assert_eq!(panel.create_form().unwrap().razao_social, "Clin A");
    assert!(!panel.is_busy());
    assert!(list.store().get(&one).unwrap().clinicas.is_empty());
    assert!(list.notice().unwrap().is_error());
}

#[tokio::test]
async fn test_save_clinica_replaces_in_place() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nome": "Ana", "crm": "123", "especialidade": "Cardio", "clinicas": [
                {"id": 7, "razaoSocial": "Clin A", "cep": "1", "cnpj": "2"},
                {"id": 8, "razaoSocial": "Clin B", "cep": "3", "cnpj": "4"}
            ]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/medico/1/clinica/7"))
        .and(body_json(json!({"razaoSocial": "Clin A2", "cep": "1", "cnpj": "2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7, "razaoSocial": "Clin A2", "cep": "1", "cnpj": "2"
        })))
        .mount(&server)
        .await;

    let mut list = MedicoList::new();
    list.load(&client, &CancellationToken::new()).await;
    let one = Identifier::Number(1);
    let seven = Identifier::Number(7);
    list.toggle_expand(&one);
    list.begin_clinica_edit(&seven).unwrap();
    list.panel_mut()
        .unwrap()
        .edit_fields_mut()
        .unwrap()
        .razao_social = "Clin A2".into();

    list.save_clinica(&client, &seven).await.unwrap();

    let medico = list.store().get(&one).unwrap();
    assert_eq!(medico.clinicas_summary(), "Clin A2, Clin B");
    assert!(list.panel().unwrap().editing().is_none());
    assert_eq!(
        list.notice().unwrap().message,
        "Clínica atualizada com sucesso."
    );
}

#[tokio::test]
async fn test_save_clinica_failure_uses_message_field() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nome": "Ana", "crm": "123", "especialidade": "Cardio", "clinicas": [
                {"id": 7, "razaoSocial": "Clin A", "cep": "1", "cnpj": "2"}
            ]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/medico/1/clinica/7"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "CEP inválido"})))
        .mount(&server)
        .await;

    let mut list = MedicoList::new();
    list.load(&client, &CancellationToken::new()).await;
    let seven = Identifier::Number(7);
    list.toggle_expand(&Identifier::Number(1));
    list.begin_clinica_edit(&seven).unwrap();

    list.save_clinica(&client, &seven).await.unwrap_err();
    assert_eq!(list.notice().unwrap().message, "Erro HTTP: 422. CEP inválido");
    assert!(list.panel().unwrap().editing().is_some());
}

// ── Deletion ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_failure_keeps_row() {
    let (server, client) = setup().await;
    let mut list = loaded_list(&server, &client).await;

    Mock::given(method("DELETE"))
        .and(path("/medico/1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"erro": "possui vínculos"})))
        .mount(&server)
        .await;

    let one = Identifier::Number(1);
    let result = list.delete_medico(&client, &one, &|_: &str| true).await;
    assert!(result.is_err());
    assert!(list.store().get(&one).is_some());
    assert_eq!(list.notice().unwrap().message, "Erro HTTP: 409. possui vínculos");
}

#[tokio::test]
async fn test_delete_success_removes_row() {
    let (server, client) = setup().await;
    let mut list = loaded_list(&server, &client).await;

    Mock::given(method("DELETE"))
        .and(path("/medico/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let one = Identifier::Number(1);
    let outcome = list.delete_medico(&client, &one, &|_: &str| true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted(one.clone()));
    assert!(list.store().is_empty());
    assert_eq!(list.notice().unwrap().message, "Médico excluído.");
}

#[tokio::test]
async fn test_delete_declined_sends_nothing() {
    let (server, client) = setup().await;
    let mut list = loaded_list(&server, &client).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let one = Identifier::Number(1);
    let outcome = list.delete_medico(&client, &one, &|_: &str| false).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Declined);
    assert_eq!(list.store().len(), 1);
}

// ── Forms ───────────────────────────────────────────────────────────

fn filled_create_form() -> CreateMedicoForm {
    let mut form = CreateMedicoForm::new();
    form.medico.nome = "Ana".into();
    form.medico.crm = "123".into();
    form.medico.especialidade = "Cardio".into();
    form
}

#[tokio::test]
async fn test_create_medico_navigates_to_list() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/medico/create"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10, "nome": "Ana"})))
        .mount(&server)
        .await;

    let mut form = filled_create_form();
    let outcome = form.submit(&client).await.unwrap();
    assert_eq!(outcome.next, Route::List);
    assert_eq!(outcome.medico.unwrap().id, Identifier::Number(10));
    assert!(outcome.clinica.is_none());
}

#[tokio::test]
async fn test_two_phase_create_retries_only_clinica_step() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/medico/create"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10, "nome": "Ana"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/medico/10/clinica"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "CNPJ inválido"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut form = filled_create_form();
    form.associate_clinica = true;
    form.clinica.razao_social = "Clin A".into();

    let err = form.submit(&client).await.unwrap_err();
    assert_eq!(err.display_message(), "Erro ao criar clínica: 400. CNPJ inválido");
    assert!(matches!(err, CoreError::ClinicaStepFailed { ref medico_id, .. } if medico_id == "10"));
    assert!(!form.is_submitting());
    assert_eq!(form.committed_medico().unwrap().id, Identifier::Number(10));

    Mock::given(method("POST"))
        .and(path("/medico/10/clinica"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "razaoSocial": "Clin A", "cep": "", "cnpj": ""
        })))
        .mount(&server)
        .await;

    let outcome = form.submit(&client).await.unwrap();
    assert_eq!(outcome.clinica.unwrap().id, Identifier::Number(3));
}

#[tokio::test]
async fn test_create_without_id_skips_clinica_step() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/medico/create"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = filled_create_form();
    form.associate_clinica = true;
    form.clinica.razao_social = "Clin A".into();

    let outcome = form.submit(&client).await.unwrap();
    assert!(outcome.medico.is_none());
    assert!(outcome.clinica.is_none());
    assert!(outcome.clinica_skipped);
    assert_eq!(outcome.next, Route::List);
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_edit_form_loads_and_submits() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/medico/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "nome": "Bia", "crm": "9"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/medico/4"))
        .and(body_json(json!({"nome": "Bia", "crm": "9", "especialidade": "Neuro"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut form = EditMedicoForm::new(Identifier::Number(4));
    let outcome = form.load(&client, &CancellationToken::new()).await;
    assert!(matches!(outcome, LoadOutcome::Loaded(())));
    assert_eq!(form.fields.especialidade, "");

    form.fields.especialidade = "Neuro".into();
    assert_eq!(form.submit(&client).await.unwrap(), Route::List);
}
