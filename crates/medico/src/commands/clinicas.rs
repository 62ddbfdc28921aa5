//! Clínica command handlers.
//!
//! Every handler goes through the médico list and its inline panel, the
//! same path the TUI takes.

use tabled::Tabled;

use medico_core::list::EMPTY_PANEL;
use medico_core::{Clinica, ClinicaFields, Client, Identifier, MedicoList};

use crate::cli::{ClinicaFieldArgs, ClinicasArgs, ClinicasCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClinicaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Razão Social")]
    razao_social: String,
    #[tabled(rename = "CEP")]
    cep: String,
    #[tabled(rename = "CNPJ")]
    cnpj: String,
}

impl From<&Clinica> for ClinicaRow {
    fn from(c: &Clinica) -> Self {
        Self {
            id: c.id.to_string(),
            razao_social: c.razao_social.clone(),
            cep: c.cep.clone(),
            cnpj: c.cnpj.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: ClinicasArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClinicasCommand::List { medico_id } => {
            let medico_id = Identifier::from(medico_id.as_str());
            let Some(list) = util::load_expanded(client, &medico_id, global).await? else {
                return Ok(());
            };
            let clinicas = list
                .expanded_medico()
                .map(|m| m.clinicas.as_slice())
                .unwrap_or_default();
            if clinicas.is_empty() && matches!(global.output, OutputFormat::Table) {
                if !global.quiet {
                    eprintln!("{EMPTY_PANEL}");
                }
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                clinicas,
                |c| ClinicaRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClinicasCommand::Create { medico_id, fields } => {
            let medico_id = Identifier::from(medico_id.as_str());
            let Some(mut list) = util::load_expanded(client, &medico_id, global).await? else {
                return Ok(());
            };
            let panel = list.panel_mut().ok_or_else(|| missing_panel(&medico_id))?;
            panel.begin_create()?;
            if let Some(form) = panel.create_form_mut() {
                overlay_clinica(form, fields);
            }
            let created = list.create_clinica(client).await;
            finish(&list, created, global)
        }

        ClinicasCommand::Update {
            medico_id,
            clinica_id,
            fields,
        } => {
            let medico_id = Identifier::from(medico_id.as_str());
            let clinica_id = Identifier::from(clinica_id.as_str());
            let Some(mut list) = util::load_expanded(client, &medico_id, global).await? else {
                return Ok(());
            };
            list.begin_clinica_edit(&clinica_id)?;
            if let Some(buffer) = list.panel_mut().and_then(|p| p.edit_fields_mut()) {
                overlay_clinica(buffer, fields);
            }
            let saved = list.save_clinica(client, &clinica_id).await;
            finish(&list, saved, global)
        }
    }
}

/// Report the list's notice on success, then render the clínica.
fn finish(
    list: &MedicoList,
    result: Result<Clinica, medico_core::CoreError>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let clinica = result?;
    util::report_notice(list, global);
    let out = output::render_single(
        &global.output,
        &clinica,
        |c| format!("{} ({})", c.razao_social, c.id),
        |c| c.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn missing_panel(medico_id: &Identifier) -> CliError {
    CliError::NotFound {
        resource_type: "Médico".into(),
        identifier: medico_id.to_string(),
        list_command: "medicos list".into(),
    }
}

fn overlay_clinica(target: &mut ClinicaFields, fields: ClinicaFieldArgs) {
    util::overlay(&mut target.razao_social, fields.razao_social);
    util::overlay(&mut target.cep, fields.cep);
    util::overlay(&mut target.cnpj, fields.cnpj);
}
