//! Médicos screen: the list with its inline clínica panel.
//!
//! Owns the [`MedicoList`] controller. Requests leave as actions and their
//! results come back through the `on_*` methods, so every state change
//! still goes through the controller's begin/finish pairs.

use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tracing::debug;

use medico_core::list::{EMPTY_LIST, EMPTY_PANEL, LOADING};
use medico_core::{
    Clinica, ClinicaMutation, CoreError, Identifier, LoadOutcome, Medico, MedicoDeletion,
    MedicoList, MutationKind, Notice, Route,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, CLINICA_LABELS};

/// Which half of the screen gets navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    Panel,
}

/// What the panel is doing with typed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PanelMode {
    #[default]
    Browse,
    Edit,
    Create,
}

pub struct MedicosScreen {
    list: MedicoList,
    table_state: TableState,
    focus: Focus,
    mode: PanelMode,
    /// Selected clínica row inside the panel.
    clinica_idx: usize,
    /// Focused field of the inline edit or create form.
    field_idx: usize,
    deletions: HashMap<Identifier, MedicoDeletion>,
    throbber_state: ThrobberState,
}

impl Default for MedicosScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicosScreen {
    pub fn new() -> Self {
        Self {
            list: MedicoList::new(),
            table_state: TableState::default(),
            focus: Focus::List,
            mode: PanelMode::Browse,
            clinica_idx: 0,
            field_idx: 0,
            deletions: HashMap::new(),
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn list(&self) -> &MedicoList {
        &self.list
    }

    /// Hand the list's pending notice to the caller, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        let notice = self.list.notice().cloned();
        self.list.dismiss_notice();
        notice
    }

    // ── Request completions ─────────────────────────────────────

    pub fn begin_load(&mut self) {
        self.list.begin_load();
    }

    pub fn on_loaded(&mut self, result: Result<Vec<Medico>, CoreError>) {
        match self.list.finish_load(result) {
            LoadOutcome::Loaded(count) => debug!(count, "médico table refreshed"),
            LoadOutcome::Failed(_) | LoadOutcome::Cancelled => {}
        }
        self.sync();
    }

    pub fn on_clinica_completed(
        &mut self,
        mutation: &ClinicaMutation,
        result: Result<Clinica, CoreError>,
    ) {
        let created = mutation.kind() == MutationKind::Create;
        if let Ok(clinica) = self.list.complete_clinica_mutation(mutation, result) {
            if created {
                self.select_clinica(&clinica.id);
            }
        }
        self.sync();
    }

    /// Claim the deletion unit for `id`.
    pub fn begin_delete(&mut self, id: &Identifier) -> Result<(), CoreError> {
        let deletion = self
            .deletions
            .entry(id.clone())
            .or_insert_with(|| self.list.deletion(id));
        deletion.begin()
    }

    pub fn on_deleted(&mut self, id: &Identifier, result: Result<(), CoreError>) {
        let outcome = match self.deletions.remove(id) {
            Some(mut deletion) => deletion.finish(result),
            None => {
                debug!(medico_id = %id, "deletion finished without a unit");
                if result.is_ok() {
                    self.list.remove_medico(id);
                }
                result.map(|()| medico_core::DeleteOutcome::Deleted(id.clone()))
            }
        };
        let _ = self.list.finish_deletion(outcome);
        self.sync();
    }

    // ── Selection ───────────────────────────────────────────────

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_medico(&self) -> Option<&Medico> {
        self.list.medicos().get(self.selected_index())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.list.medicos().len();
        if len == 0 {
            return;
        }
        let next = self.selected_index().saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn expanded_clinicas(&self) -> &[Clinica] {
        self.list
            .expanded_medico()
            .map(|m| m.clinicas.as_slice())
            .unwrap_or_default()
    }

    fn selected_clinica(&self) -> Option<&Clinica> {
        self.expanded_clinicas().get(self.clinica_idx)
    }

    fn select_clinica(&mut self, id: &Identifier) {
        if let Some(idx) = self.expanded_clinicas().iter().position(|c| &c.id == id) {
            self.clinica_idx = idx;
        }
    }

    /// Re-derive focus, mode and selection after the list changed.
    fn sync(&mut self) {
        let len = self.list.medicos().len();
        if len == 0 {
            self.table_state.select(None);
        } else if self.selected_index() >= len || self.table_state.selected().is_none() {
            self.table_state.select(Some(self.selected_index().min(len - 1)));
        }

        match self.list.panel() {
            None => {
                self.focus = Focus::List;
                self.mode = PanelMode::Browse;
            }
            Some(panel) => {
                let still_active = match self.mode {
                    PanelMode::Browse => true,
                    PanelMode::Edit => panel.editing().is_some(),
                    PanelMode::Create => panel.is_creating(),
                };
                if !still_active {
                    self.mode = PanelMode::Browse;
                    self.field_idx = 0;
                }
            }
        }

        let clinicas = self.expanded_clinicas().len();
        if self.clinica_idx >= clinicas {
            self.clinica_idx = clinicas.saturating_sub(1);
        }
    }

    fn panel_busy(&self) -> bool {
        self.list.panel().is_some_and(medico_core::ClinicPanel::is_busy)
    }

    // ── Key handling ────────────────────────────────────────────

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                self.sync();
                None
            }
            KeyCode::Char('G') => {
                let last = self.list.medicos().len().saturating_sub(1);
                self.table_state.select(Some(last));
                self.sync();
                None
            }
            KeyCode::Enter => {
                let id = self.selected_medico()?.id.clone();
                self.list.toggle_expand(&id);
                self.clinica_idx = 0;
                self.sync();
                None
            }
            KeyCode::Tab if self.list.panel().is_some() => {
                self.focus = Focus::Panel;
                None
            }
            KeyCode::Esc if self.list.panel().is_some() => {
                self.list.collapse();
                self.sync();
                None
            }
            KeyCode::Char('n') => Some(Action::Navigate(Route::Create)),
            KeyCode::Char('e') => {
                let id = self.selected_medico()?.id.clone();
                Some(Action::Navigate(Route::Edit(id)))
            }
            KeyCode::Char('d') => {
                let medico = self.selected_medico()?;
                Some(Action::RequestDelete {
                    id: medico.id.clone(),
                    nome: medico.nome.clone(),
                })
            }
            KeyCode::Char('r') => Some(Action::LoadMedicos),
            _ => None,
        }
    }

    fn handle_panel_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.expanded_clinicas().len();
                if len > 0 {
                    self.clinica_idx = (self.clinica_idx + 1).min(len - 1);
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.clinica_idx = self.clinica_idx.saturating_sub(1);
                None
            }
            KeyCode::Char('e') => {
                let clinica_id = self.selected_clinica()?.id.clone();
                match self.list.begin_clinica_edit(&clinica_id) {
                    Ok(()) => {
                        self.mode = PanelMode::Edit;
                        self.field_idx = 0;
                        None
                    }
                    Err(e) => Some(Action::Notify(Notice::from(&e))),
                }
            }
            KeyCode::Char('a') => {
                let panel = self.list.panel_mut()?;
                match panel.begin_create() {
                    Ok(()) => {
                        self.mode = PanelMode::Create;
                        self.field_idx = 0;
                        None
                    }
                    Err(e) => Some(Action::Notify(Notice::from(&e))),
                }
            }
            KeyCode::Tab | KeyCode::Esc => {
                self.focus = Focus::List;
                None
            }
            _ => None,
        }
    }

    fn handle_panel_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let mode = self.mode;
        match key.code {
            KeyCode::Esc => {
                let panel = self.list.panel_mut()?;
                let cancelled = match mode {
                    PanelMode::Edit => panel.cancel_edit(),
                    PanelMode::Create => panel.cancel_create(),
                    PanelMode::Browse => Ok(()),
                };
                match cancelled {
                    Ok(()) => {
                        self.mode = PanelMode::Browse;
                        self.field_idx = 0;
                        None
                    }
                    Err(e) => Some(Action::Notify(Notice::from(&e))),
                }
            }
            KeyCode::Enter => {
                let panel = self.list.panel_mut()?;
                let prepared = match mode {
                    PanelMode::Edit => {
                        let clinica_id = panel.editing()?.clinica_id.clone();
                        panel.prepare_save(&clinica_id)
                    }
                    PanelMode::Create => panel.prepare_create(),
                    PanelMode::Browse => return None,
                };
                Some(match prepared {
                    Ok(mutation) => Action::SubmitClinica(mutation),
                    Err(e) => Action::Notify(Notice::from(&e)),
                })
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field_idx = fields::step(self.field_idx, CLINICA_LABELS.len(), true);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field_idx = fields::step(self.field_idx, CLINICA_LABELS.len(), false);
                None
            }
            code => {
                if self.panel_busy() {
                    return None;
                }
                let field_idx = self.field_idx;
                let panel = self.list.panel_mut()?;
                let buffer = match mode {
                    PanelMode::Edit => panel.edit_fields_mut(),
                    PanelMode::Create => panel.create_form_mut(),
                    PanelMode::Browse => None,
                }?;
                if let Some(value) = fields::clinica_field(buffer, field_idx) {
                    fields::edit_text(value, code);
                }
                None
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        if self.list.is_loading() {
            let throbber = Throbber::default()
                .label(format!("  {LOADING}"))
                .style(Style::default().fg(theme::DIM_WHITE))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, area, &mut self.throbber_state.clone());
            return;
        }
        if self.list.medicos().is_empty() {
            let text = Line::from(Span::styled(format!("  {EMPTY_LIST}"), theme::table_row()));
            frame.render_widget(Paragraph::new(text), area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Nome").style(theme::table_header()),
            Cell::from("CRM").style(theme::table_header()),
            Cell::from("Especialidade").style(theme::table_header()),
            Cell::from("Clínicas").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let expanded = self.list.expanded_id();
        let rows: Vec<Row> = self
            .list
            .medicos()
            .iter()
            .enumerate()
            .map(|(i, medico)| {
                let is_selected = i == selected_idx;
                let marker = if expanded == Some(&medico.id) { "▾ " } else { "▸ " };
                let deleting = self
                    .deletions
                    .get(&medico.id)
                    .is_some_and(MedicoDeletion::is_in_flight);
                let nome = if deleting {
                    format!("{marker}{} (excluindo...)", medico.nome)
                } else {
                    format!("{marker}{}", medico.nome)
                };
                Row::new(vec![
                    Cell::from(nome).style(Style::default().fg(theme::NEON_CYAN).add_modifier(
                        if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        },
                    )),
                    Cell::from(medico.crm.clone()),
                    Cell::from(medico.especialidade.clone()),
                    Cell::from(medico.clinicas_summary()).style(Style::default().fg(theme::CORAL)),
                ])
                .style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(20),
            Constraint::Min(20),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_panel(&self, frame: &mut Frame, area: Rect, medico: &Medico) {
        let focused = self.focus == Focus::Panel;
        let block = Block::default()
            .title(format!(" Clínicas de {} ", medico.nome))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(panel) = self.list.panel() else {
            return;
        };
        let editing = panel.editing();
        let mut lines = Vec::new();

        if medico.clinicas.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {EMPTY_PANEL}"),
                theme::table_row(),
            )));
        }
        for (idx, clinica) in medico.clinicas.iter().enumerate() {
            let selected = focused && idx == self.clinica_idx;
            let style = if selected {
                theme::table_selected()
            } else {
                theme::table_row()
            };
            let marker = if selected { " ▸ " } else { "   " };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(format!("{:<28}", clinica.razao_social), style),
                Span::styled(format!("CEP {:<12}", clinica.cep), style),
                Span::styled(format!("CNPJ {}", clinica.cnpj), style),
            ]));

            if let Some(buffer) = editing.filter(|b| b.clinica_id == clinica.id) {
                let active = self.mode == PanelMode::Edit;
                let focus = active.then_some(self.field_idx);
                lines.extend(fields::field_lines(
                    &CLINICA_LABELS,
                    &fields::clinica_values(&buffer.fields),
                    focus,
                ));
            }
        }

        if let Some(form) = panel.create_form() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Nova clínica",
                Style::default()
                    .fg(theme::ELECTRIC_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )));
            let focus = (self.mode == PanelMode::Create).then_some(self.field_idx);
            lines.extend(fields::field_lines(
                &CLINICA_LABELS,
                &fields::clinica_values(form),
                focus,
            ));
        }

        if let Some(kind) = panel.in_flight() {
            let label = match kind {
                MutationKind::Update => "  Salvando clínica...",
                MutationKind::Create => "  Criando clínica...",
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn hint_line(&self) -> Line<'static> {
        match (self.focus, self.mode) {
            (Focus::List, _) => fields::hints(&[
                ("j/k", "mover"),
                ("Enter", "clínicas"),
                ("Tab", "painel"),
                ("n", "novo"),
                ("e", "editar"),
                ("d", "excluir"),
                ("r", "recarregar"),
            ]),
            (Focus::Panel, PanelMode::Browse) => fields::hints(&[
                ("j/k", "mover"),
                ("e", "editar clínica"),
                ("a", "adicionar"),
                ("Tab", "lista"),
            ]),
            (Focus::Panel, PanelMode::Edit | PanelMode::Create) => fields::hints(&[
                ("Tab", "próximo campo"),
                ("Enter", "salvar"),
                ("Esc", "cancelar"),
            ]),
        }
    }
}

impl Component for MedicosScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (self.focus, self.mode) {
            (Focus::List, _) => self.handle_list_key(key),
            (Focus::Panel, PanelMode::Browse) => self.handle_panel_browse_key(key),
            (Focus::Panel, PanelMode::Edit | PanelMode::Create) => self.handle_panel_form_key(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Tick = action {
            if self.list.is_loading() {
                self.throbber_state.calc_next();
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let count = self.list.medicos().len();
        let block = Block::default()
            .title(format!(" Médicos ({count}) "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focus == Focus::List {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let expanded = self.list.expanded_medico();
        let [body, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        match expanded {
            Some(medico) => {
                let [table_area, panel_area] =
                    Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(body);
                self.render_table(frame, table_area);
                self.render_panel(frame, panel_area, medico);
            }
            None => self.render_table(frame, body),
        }

        frame.render_widget(Paragraph::new(self.hint_line()), hints);
    }

    fn captures_input(&self) -> bool {
        self.focus == Focus::Panel && self.mode != PanelMode::Browse
    }

    fn id(&self) -> &'static str {
        "Medicos"
    }
}
