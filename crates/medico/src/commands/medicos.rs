//! Médico command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use medico_core::list::EMPTY_LIST;
use medico_core::notice::{self, Notice};
use medico_core::{
    Client, CreateMedicoForm, DeleteOutcome, EditMedicoForm, Identifier, LoadOutcome, Medico,
    MedicoList, fetch_medico,
};

use crate::cli::{
    CreateMedicoArgs, GlobalOpts, MedicoFieldArgs, MedicosArgs, MedicosCommand, OutputFormat,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MedicoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nome")]
    nome: String,
    #[tabled(rename = "CRM")]
    crm: String,
    #[tabled(rename = "Especialidade")]
    especialidade: String,
    #[tabled(rename = "Clínicas")]
    clinicas: String,
}

impl From<&Medico> for MedicoRow {
    fn from(m: &Medico) -> Self {
        Self {
            id: m.id.to_string(),
            nome: m.nome.clone(),
            crm: m.crm.clone(),
            especialidade: m.especialidade.clone(),
            clinicas: m.clinicas_summary(),
        }
    }
}

fn detail(m: &Medico) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:            {}", m.id);
    let _ = writeln!(out, "Nome:          {}", m.nome);
    let _ = writeln!(out, "CRM:           {}", m.crm);
    let _ = writeln!(out, "Especialidade: {}", m.especialidade);
    let _ = write!(out, "Clínicas:      {}", m.clinicas_summary());
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Client,
    args: MedicosArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        MedicosCommand::List => {
            let Some(list) = util::load_list(client, global).await? else {
                return Ok(());
            };
            if list.medicos().is_empty() && matches!(global.output, OutputFormat::Table) {
                if !global.quiet {
                    eprintln!("{EMPTY_LIST}");
                }
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                list.medicos(),
                |m| MedicoRow::from(m),
                |m| m.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicosCommand::Show { id } => {
            let medico = fetch_medico(client, &Identifier::from(id.as_str())).await?;
            let out = output::render_single(&global.output, &medico, detail, |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MedicosCommand::Create(create) => {
            let mut form = create_form(create);
            let outcome = form.submit(client).await?;
            output::print_notice(&Notice::success(notice::MEDICO_CRIADO), color, global.quiet);
            if outcome.clinica.is_some() {
                output::print_notice(&Notice::success(notice::CLINICA_CRIADA), color, global.quiet);
            } else if outcome.clinica_skipped {
                output::print_notice(&Notice::error(notice::CLINICA_PENDENTE), color, global.quiet);
            }
            if let Some(medico) = outcome.medico {
                let out =
                    output::render_single(&global.output, &medico, detail, |m| m.id.to_string());
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        MedicosCommand::Edit { id, fields } => {
            let mut form = EditMedicoForm::new(Identifier::from(id.as_str()));
            match form.load(client, &util::ctrl_c_token()).await {
                LoadOutcome::Loaded(()) => {}
                LoadOutcome::Failed(e) => return Err(e.into()),
                LoadOutcome::Cancelled => return Ok(()),
            }
            overlay_medico(&mut form, fields);
            form.submit(client).await?;
            output::print_notice(
                &Notice::success(notice::MEDICO_ATUALIZADO),
                color,
                global.quiet,
            );
            Ok(())
        }

        MedicosCommand::Delete { id } => {
            util::require_interactive("medicos delete", global.yes)?;
            let id = Identifier::from(id.as_str());
            let yes = global.yes;
            let confirm = |prompt: &str| {
                util::confirm(prompt, yes).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "confirmation prompt failed");
                    false
                })
            };

            let mut list = MedicoList::new();
            match list.delete_medico(client, &id, &confirm).await? {
                DeleteOutcome::Deleted(_) => util::report_notice(&list, global),
                DeleteOutcome::Declined => {
                    if !global.quiet {
                        eprintln!("Exclusão cancelada.");
                    }
                }
            }
            Ok(())
        }
    }
}

fn create_form(args: CreateMedicoArgs) -> CreateMedicoForm {
    let mut form = CreateMedicoForm::new();
    form.medico.nome = args.nome;
    form.medico.crm = args.crm;
    form.medico.especialidade = args.especialidade;
    form.associate_clinica = args.clinica_razao_social.is_some()
        || args.clinica_cep.is_some()
        || args.clinica_cnpj.is_some();
    form.clinica.razao_social = args.clinica_razao_social.unwrap_or_default();
    form.clinica.cep = args.clinica_cep.unwrap_or_default();
    form.clinica.cnpj = args.clinica_cnpj.unwrap_or_default();
    form
}

fn overlay_medico(form: &mut EditMedicoForm, fields: MedicoFieldArgs) {
    util::overlay(&mut form.fields.nome, fields.nome);
    util::overlay(&mut form.fields.crm, fields.crm);
    util::overlay(&mut form.fields.especialidade, fields.especialidade);
}
