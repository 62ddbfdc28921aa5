//! "Novo Médico" and "Editar Médico" forms.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use medico_core::form::LOADING_MEDICO;
use medico_core::notice::{self, Notice};
use medico_core::{
    CoreError, CreateMedicoForm, CreateOutcome, EditMedicoForm, Identifier, LoadOutcome, Medico,
    Route,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fields::{self, CLINICA_LABELS, MEDICO_LABELS};

/// Index of the "also create a clínica" toggle in the create form.
const TOGGLE_IDX: usize = MEDICO_LABELS.len();

#[derive(Debug)]
enum FormKind {
    Create(CreateMedicoForm),
    Edit(EditMedicoForm),
}

pub struct MedicoFormScreen {
    kind: FormKind,
    field_idx: usize,
    /// A create request is running on another task.
    pending: bool,
    throbber_state: ThrobberState,
}

impl MedicoFormScreen {
    pub fn create() -> Self {
        Self::with_kind(FormKind::Create(CreateMedicoForm::new()))
    }

    /// Edit form for `id`, waiting for its médico to load.
    pub fn edit(id: Identifier) -> Self {
        let mut form = EditMedicoForm::new(id);
        form.begin_load();
        Self::with_kind(FormKind::Edit(form))
    }

    fn with_kind(kind: FormKind) -> Self {
        Self {
            kind,
            field_idx: 0,
            pending: false,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn route(&self) -> Route {
        match &self.kind {
            FormKind::Create(_) => Route::Create,
            FormKind::Edit(form) => Route::Edit(form.id().clone()),
        }
    }

    fn is_loading(&self) -> bool {
        matches!(&self.kind, FormKind::Edit(form) if form.is_loading())
    }

    fn is_busy(&self) -> bool {
        self.pending || matches!(&self.kind, FormKind::Edit(form) if form.is_submitting())
    }

    fn field_count(&self) -> usize {
        match &self.kind {
            FormKind::Create(form) if form.associate_clinica => {
                MEDICO_LABELS.len() + 1 + CLINICA_LABELS.len()
            }
            FormKind::Create(_) => MEDICO_LABELS.len() + 1,
            FormKind::Edit(_) => MEDICO_LABELS.len(),
        }
    }

    // ── Completions ─────────────────────────────────────────────

    /// Fill the edit form. Results for another id are ignored.
    pub fn on_loaded(&mut self, id: &Identifier, result: Result<Medico, CoreError>) -> Option<Action> {
        let FormKind::Edit(form) = &mut self.kind else {
            return None;
        };
        if form.id() != id || !form.is_loading() {
            return None;
        }
        match form.finish_load(result) {
            LoadOutcome::Failed(e) => Some(Action::Notify(Notice::from(&e))),
            LoadOutcome::Loaded(()) | LoadOutcome::Cancelled => None,
        }
    }

    /// Take back the submitted form. On success, report and leave.
    pub fn on_created(
        &mut self,
        form: CreateMedicoForm,
        result: Result<CreateOutcome, CoreError>,
    ) -> Vec<Action> {
        self.pending = false;
        if let FormKind::Create(current) = &mut self.kind {
            *current = form;
        }
        created_actions(result)
    }

    pub fn on_updated(&mut self, id: &Identifier, result: Result<(), CoreError>) -> Vec<Action> {
        match &mut self.kind {
            FormKind::Edit(form) if form.id() == id => updated_actions(form.finish_submit(result)),
            _ => updated_actions(result.map(|()| Route::List)),
        }
    }

    // ── Input ───────────────────────────────────────────────────

    fn submit(&mut self) -> Action {
        match &mut self.kind {
            FormKind::Create(form) => {
                if self.pending {
                    return Action::Notify(Notice::from(&CoreError::Busy));
                }
                if let Err(e) = form.medico.validate() {
                    return Action::Notify(Notice::from(&e));
                }
                self.pending = true;
                Action::CreateMedico(Box::new(form.clone()))
            }
            FormKind::Edit(form) => match form.begin_submit() {
                Ok(()) => Action::UpdateMedico {
                    id: form.id().clone(),
                    fields: form.fields.clone(),
                },
                Err(e) => Action::Notify(Notice::from(&e)),
            },
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        let idx = self.field_idx;
        match &mut self.kind {
            FormKind::Create(form) => {
                if idx < TOGGLE_IDX {
                    fields::medico_field(&mut form.medico, idx)
                } else {
                    fields::clinica_field(&mut form.clinica, idx.checked_sub(TOGGLE_IDX + 1)?)
                }
            }
            FormKind::Edit(form) => fields::medico_field(&mut form.fields, idx),
        }
    }

    fn on_toggle(&self) -> bool {
        matches!(self.kind, FormKind::Create(_)) && self.field_idx == TOGGLE_IDX
    }

    // ── Rendering ───────────────────────────────────────────────

    fn form_lines(&self) -> Vec<Line<'static>> {
        let focus = |offset: usize, len: usize| {
            self.field_idx
                .checked_sub(offset)
                .filter(|idx| *idx < len)
        };
        match &self.kind {
            FormKind::Edit(form) => fields::field_lines(
                &MEDICO_LABELS,
                &fields::medico_values(&form.fields),
                focus(0, MEDICO_LABELS.len()),
            ),
            FormKind::Create(form) => {
                let mut lines = fields::field_lines(
                    &MEDICO_LABELS,
                    &fields::medico_values(&form.medico),
                    focus(0, MEDICO_LABELS.len()),
                );
                let toggle_focused = self.field_idx == TOGGLE_IDX;
                let check = if form.associate_clinica { "[x]" } else { "[ ]" };
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled(
                        if toggle_focused { "▸ " } else { "  " },
                        theme::field_label(toggle_focused),
                    ),
                    Span::styled(format!("{check} "), theme::field_value()),
                    Span::styled(
                        "Criar e vincular uma clínica a este médico",
                        theme::field_label(toggle_focused),
                    ),
                ]));
                if form.associate_clinica {
                    lines.push(Line::from(""));
                    lines.extend(fields::field_lines(
                        &CLINICA_LABELS,
                        &fields::clinica_values(&form.clinica),
                        focus(TOGGLE_IDX + 1, CLINICA_LABELS.len()),
                    ));
                }
                if !self.pending && form.committed_medico().is_some() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "  Médico já criado. Enter tenta criar a clínica novamente.",
                        Style::default().fg(theme::ELECTRIC_YELLOW),
                    )));
                }
                lines
            }
        }
    }
}

/// Notices and navigation after a create attempt.
fn created_actions(result: Result<CreateOutcome, CoreError>) -> Vec<Action> {
    match result {
        Ok(outcome) => {
            let message = if outcome.clinica_skipped {
                Notice::error(format!(
                    "{} {}",
                    notice::MEDICO_CRIADO,
                    notice::CLINICA_PENDENTE
                ))
            } else if outcome.clinica.is_some() {
                Notice::success(format!(
                    "{} {}",
                    notice::MEDICO_CRIADO,
                    notice::CLINICA_CRIADA
                ))
            } else {
                Notice::success(notice::MEDICO_CRIADO)
            };
            vec![Action::Notify(message), Action::Navigate(outcome.next)]
        }
        Err(e) => vec![Action::Notify(Notice::from(&e))],
    }
}

/// Notices and navigation after an edit submit.
fn updated_actions(result: Result<Route, CoreError>) -> Vec<Action> {
    match result {
        Ok(route) => vec![
            Action::Notify(Notice::success(notice::MEDICO_ATUALIZADO)),
            Action::Navigate(route),
        ],
        Err(e) => vec![Action::Notify(Notice::from(&e))],
    }
}

/// What to do with a create result when its form is already gone.
pub fn orphan_created(result: Result<CreateOutcome, CoreError>) -> Vec<Action> {
    created_actions(result)
        .into_iter()
        .filter(|a| matches!(a, Action::Notify(_)))
        .collect()
}

/// What to do with an update result when its form is already gone.
pub fn orphan_updated(result: Result<(), CoreError>) -> Vec<Action> {
    updated_actions(result.map(|()| Route::List))
        .into_iter()
        .filter(|a| matches!(a, Action::Notify(_)))
        .collect()
}

impl Component for MedicoFormScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::Navigate(Route::List)));
        }
        if self.is_loading() || self.is_busy() {
            return Ok(None);
        }

        let count = self.field_count();
        let action = match key.code {
            KeyCode::Enter => Some(self.submit()),
            KeyCode::Tab | KeyCode::Down => {
                self.field_idx = fields::step(self.field_idx, count, true);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field_idx = fields::step(self.field_idx, count, false);
                None
            }
            KeyCode::Char(' ') if self.on_toggle() => {
                if let FormKind::Create(form) = &mut self.kind {
                    form.associate_clinica = !form.associate_clinica;
                }
                None
            }
            code => {
                if let Some(value) = self.focused_text() {
                    fields::edit_text(value, code);
                }
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Tick = action {
            if self.is_loading() || self.is_busy() {
                self.throbber_state.calc_next();
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.kind {
            FormKind::Create(_) => " Novo Médico ".to_owned(),
            FormKind::Edit(form) => format!(" Editar Médico #{} ", form.id()),
        };
        let [column] = Layout::horizontal([Constraint::Max(72)])
            .flex(Flex::Center)
            .areas(area);
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(column);
        frame.render_widget(block, column);

        let [body, status, hints] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        if self.is_loading() {
            let throbber = Throbber::default()
                .label(format!("  {LOADING_MEDICO}"))
                .style(Style::default().fg(theme::DIM_WHITE))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, body, &mut self.throbber_state.clone());
        } else {
            let mut lines = vec![Line::from("")];
            lines.extend(self.form_lines());
            frame.render_widget(Paragraph::new(lines), body);
        }

        if self.is_busy() {
            let throbber = Throbber::default()
                .label("  Salvando...")
                .style(Style::default().fg(theme::DIM_WHITE))
                .throbber_style(Style::default().fg(theme::ELECTRIC_YELLOW));
            frame.render_stateful_widget(throbber, status, &mut self.throbber_state.clone());
        }

        let mut pairs = vec![("Tab", "próximo campo"), ("Enter", "salvar"), ("Esc", "voltar")];
        if self.on_toggle() {
            pairs.insert(1, ("Espaço", "marcar"));
        }
        frame.render_widget(Paragraph::new(fields::hints(&pairs)), hints);
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn id(&self) -> &'static str {
        "MedicoForm"
    }
}
