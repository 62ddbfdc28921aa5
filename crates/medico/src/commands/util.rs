//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use medico_core::list::LOADING;
use medico_core::{Client, Identifier, LoadOutcome, MedicoList};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}

/// Refuse to prompt when nobody can answer.
pub fn require_interactive(action: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag || io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
    }
}

/// Stderr spinner, hidden in quiet mode or when stderr is not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Token cancelled on Ctrl-C.
pub fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let guard = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            guard.cancel();
        }
    });
    token
}

/// Load the full médico list behind a spinner.
///
/// Returns `None` when the load was interrupted.
pub async fn load_list(
    client: &Client,
    global: &GlobalOpts,
) -> Result<Option<MedicoList>, CliError> {
    let mut list = MedicoList::new();
    let pb = spinner(LOADING, global.quiet);
    let outcome = list.load(client, &ctrl_c_token()).await;
    pb.finish_and_clear();
    match outcome {
        LoadOutcome::Loaded(_) => Ok(Some(list)),
        LoadOutcome::Failed(e) => Err(e.into()),
        LoadOutcome::Cancelled => Ok(None),
    }
}

/// Load the list and open the clínica panel of `medico_id`.
pub async fn load_expanded(
    client: &Client,
    medico_id: &Identifier,
    global: &GlobalOpts,
) -> Result<Option<MedicoList>, CliError> {
    let Some(mut list) = load_list(client, global).await? else {
        return Ok(None);
    };
    list.toggle_expand(medico_id);
    if list.expanded_medico().is_none() {
        return Err(CliError::NotFound {
            resource_type: "Médico".into(),
            identifier: medico_id.to_string(),
            list_command: "medicos list".into(),
        });
    }
    Ok(Some(list))
}

/// Print the list's current notice, if any.
pub fn report_notice(list: &MedicoList, global: &GlobalOpts) {
    if let Some(notice) = list.notice() {
        output::print_notice(notice, output::should_color(&global.color), global.quiet);
    }
}

/// Replace `target` when `value` is given.
pub fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}
