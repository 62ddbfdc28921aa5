//! Integration tests for the `medico` CLI binary.
//!
//! Parsing, help, completions and config errors run without a backend;
//! the rest drive the binary against a `wiremock` server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `medico` binary with env isolation.
///
/// Clears all `MEDICO_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn medico_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("medico");
    cmd.env("HOME", "/tmp/medico-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/medico-cli-test-nonexistent")
        .env_remove("MEDICO_PROFILE")
        .env_remove("MEDICO_API_URL")
        .env_remove("MEDICO_TOKEN")
        .env_remove("MEDICO_OUTPUT")
        .env_remove("MEDICO_INSECURE")
        .env_remove("MEDICO_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `medico` pointed at `server` with a token, so the keyring is never asked.
fn backend_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = medico_cmd();
    cmd.args(["--api-url", &server.uri(), "--token", "test-token", "--color", "never"]);
    cmd
}

/// Run a prepared command off the async runtime.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn medicos_body() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "nome": "Ana",
            "crm": "123",
            "especialidade": "Cardio",
            "clinicas": []
        },
        {
            "id": 2,
            "nome": "Bruno",
            "crm": "456",
            "especialidade": "Pediatria",
            "clinicas": [
                { "id": 9, "razaoSocial": "Clínica Sol", "cep": "01000-000", "cnpj": "11" }
            ]
        }
    ])
}

async fn server_with_list() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_json(medicos_body()))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = medico_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    medico_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("médicos")
            .and(predicate::str::contains("medicos"))
            .and(predicate::str::contains("clinicas"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    medico_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("medico"));
}

#[test]
fn test_invalid_subcommand() {
    medico_cmd()
        .arg("pacientes")
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    medico_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    medico_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    medico_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

// ── Config errors ───────────────────────────────────────────────────

#[test]
fn test_no_backend_configured() {
    let output = medico_cmd().args(["medicos", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No backend configured"),
        "Expected config error in output:\n{text}"
    );
}

#[test]
fn test_unknown_profile() {
    medico_cmd()
        .args(["-p", "prod", "medicos", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}

#[test]
fn test_invalid_api_url_is_usage_error() {
    medico_cmd()
        .args(["--api-url", "not a url", "--token", "t", "medicos", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_profiles_without_config() {
    medico_cmd()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

// ── Médicos ─────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_table() {
    let server = server_with_list().await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["medicos", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Especialidade"), "{stdout}");
    assert!(stdout.contains("Ana"));
    assert!(stdout.contains("\u{2014}"));
    assert!(stdout.contains("Clínica Sol"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_plain_prints_ids() {
    let server = server_with_list().await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["-o", "plain", "medicos", "list"]);
    let output = run(cmd).await;

    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_list_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["medicos", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Nenhum médico encontrado."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medico/77"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "erro": "Médico não encontrado" })),
        )
        .mount(&server)
        .await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["medicos", "show", "77"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(
        combined_output(&output).contains("Erro HTTP: 404. Médico não encontrado"),
        "{}",
        combined_output(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/medico"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "erro": "Token inválido" })))
        .mount(&server)
        .await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["medicos", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("set-token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_requires_yes_when_not_interactive() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["medicos", "delete", "1"]).write_stdin("");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/medico/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["--yes", "medicos", "delete", "1"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Médico excluído."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_with_clinica() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/medico/create"))
        .and(body_json(json!({ "nome": "Ana", "crm": "123", "especialidade": "Cardio" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "nome": "Ana", "crm": "123", "especialidade": "Cardio"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/medico/5/clinica"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "razaoSocial": "Clínica Sol", "cep": "", "cnpj": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args([
        "medicos",
        "create",
        "--nome",
        "Ana",
        "--crm",
        "123",
        "--especialidade",
        "Cardio",
        "--clinica-razao-social",
        "Clínica Sol",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Médico criado com sucesso."));
    assert!(stderr.contains("Clínica criada com sucesso."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_rejects_blank_field() {
    let server = MockServer::start().await;
    let mut cmd = backend_cmd(&server);
    cmd.args([
        "medicos",
        "create",
        "--nome",
        "Ana",
        "--crm",
        " ",
        "--especialidade",
        "Cardio",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
}

// ── Clínicas ────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_clinica_update_overlays_current_values() {
    let server = server_with_list().await;
    Mock::given(method("PUT"))
        .and(path("/medico/2/clinica/9"))
        .and(body_json(json!({
            "razaoSocial": "Clínica Lua",
            "cep": "01000-000",
            "cnpj": "11"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "razaoSocial": "Clínica Lua", "cep": "01000-000", "cnpj": "11"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args([
        "clinicas",
        "update",
        "2",
        "9",
        "--razao-social",
        "Clínica Lua",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Clínica atualizada com sucesso."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clinica_create_failure_uses_message_field() {
    let server = server_with_list().await;
    Mock::given(method("POST"))
        .and(path("/medico/1/clinica"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "CNPJ inválido" })),
        )
        .mount(&server)
        .await;

    let mut cmd = backend_cmd(&server);
    cmd.args(["clinicas", "create", "1", "--cnpj", "x"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Erro HTTP: 400. CNPJ inválido"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clinicas_for_unknown_medico() {
    let server = server_with_list().await;
    let mut cmd = backend_cmd(&server);
    cmd.args(["clinicas", "list", "42"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
}
