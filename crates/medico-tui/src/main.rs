//! `medico-tui`: terminal front end for the médico registry.
//!
//! Built on [ratatui](https://ratatui.rs) over the same `medico-core`
//! controllers the CLI uses. Screens follow the web routes: `/` (home),
//! `/medico` (list with inline clínicas), `/medico/create` and
//! `/medico/{id}/edit`.
//!
//! Logs go to a file (default `/tmp/medico-tui.log`) so they never corrupt
//! the screen.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use medico_config::{Config, Profile};
use medico_core::{ApiConfig, Route};

use crate::app::App;

/// Terminal UI for managing médicos and their clínicas.
#[derive(Parser, Debug)]
#[command(name = "medico-tui", version, about)]
struct Cli {
    /// Profile from the shared config file
    #[arg(short, long, env = "MEDICO_PROFILE")]
    profile: Option<String>,

    /// Backend base URL (overrides the profile)
    #[arg(short = 'u', long, env = "MEDICO_API_URL")]
    api_url: Option<String>,

    /// Bearer token (overrides env, keyring and config)
    #[arg(long)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Route to open first, e.g. `/medico` or `/medico/3/edit`
    #[arg(long, default_value = "/", value_parser = parse_route)]
    route: Route,

    /// Log file path
    #[arg(long, default_value = "/tmp/medico-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_route(s: &str) -> Result<Route, String> {
    Route::parse(s).ok_or_else(|| format!("unknown route '{s}'"))
}

/// File-only tracing. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medico_tui={log_level},medico_core={log_level},medico_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("medico-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Pick the profile to use and apply flag overrides.
///
/// Priority: flags > named profile > default profile. Without a profile
/// the URL flag alone is enough.
fn resolve_profile(cli: &Cli, cfg: &Config) -> Result<(String, Profile)> {
    let name = cli
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned());

    let mut profile = match cfg.profiles.get(&name) {
        Some(profile) => profile.clone(),
        None if cli.profile.is_some() => medico_config::find_profile(cfg, &name)?.clone(),
        None if cli.api_url.is_some() => Profile::default(),
        None => {
            return Err(eyre!(
                "No backend configured. Run `medico config init` or pass --api-url."
            ));
        }
    };

    if let Some(url) = &cli.api_url {
        profile.api_url.clone_from(url);
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }
    Ok((name, profile))
}

fn build_api_config(cli: &Cli) -> Result<ApiConfig> {
    let cfg = medico_config::load_config()?;
    let (name, profile) = resolve_profile(cli, &cfg)?;
    let token = cli
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| medico_config::resolve_token(&profile, &name));
    Ok(medico_config::build_api_config(
        &profile,
        &cfg.defaults,
        token,
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    // Resolve the backend before touching the terminal so errors print plainly.
    let api = build_api_config(&cli)?;
    let client = api.connect()?;

    info!(
        api_url = %api.base_url,
        authenticated = api.token.is_some(),
        route = %cli.route,
        "starting medico-tui"
    );

    let mut app = App::new(client, api.base_url.to_string());
    app.run(cli.route).await
}
