//! Application core: event loop, action dispatch, request tasks and
//! overlays.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use medico_core::notice::AUTO_DISMISS;
use medico_core::{Client, CoreError, Identifier, Notice, Route, fetch_medico, fetch_medicos};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::home::HomeScreen;
use crate::screens::medico_form::{self, MedicoFormScreen};
use crate::screens::medicos::MedicosScreen;
use crate::theme;
use crate::tui::Tui;

pub struct App {
    client: Client,
    /// Backend URL shown in the status bar.
    backend: String,
    running: bool,
    route: Route,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,

    home: HomeScreen,
    medicos: MedicosScreen,
    form: Option<MedicoFormScreen>,

    notification: Option<(Notice, Instant)>,
    pending_confirm: Option<ConfirmAction>,
    help_visible: bool,

    /// Cancels the running list load when the list is left.
    load_cancel: CancellationToken,
    /// Bumped on every load and on leaving the list; stale results are dropped.
    load_generation: u64,
    /// Cancels the edit form's GET when the form is left.
    form_cancel: CancellationToken,
}

impl App {
    pub fn new(client: Client, backend: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            client,
            backend,
            running: true,
            route: Route::Home,
            action_tx,
            action_rx,
            home: HomeScreen::new(),
            medicos: MedicosScreen::new(),
            form: None,
            notification: None,
            pending_confirm: None,
            help_visible: false,
            load_cancel: CancellationToken::new(),
            load_generation: 0,
            form_cancel: CancellationToken::new(),
        }
    }

    /// Run until the user quits.
    pub async fn run(&mut self, start: Route) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.action_tx.send(Action::Navigate(start))?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(backend = %self.backend, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action)?;
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.load_cancel.cancel();
        self.form_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active_screen(&self) -> ScreenId {
        ScreenId::for_route(&self.route)
    }

    fn active_component(&mut self) -> Option<&mut dyn Component> {
        match self.active_screen() {
            ScreenId::Home => Some(&mut self.home),
            ScreenId::Medicos => Some(&mut self.medicos),
            ScreenId::Form => self.form.as_mut().map(|f| f as &mut dyn Component),
        }
    }

    // ── Input ───────────────────────────────────────────────────

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let captures = self.active_component().is_some_and(|c| c.captures_input());
        if !captures {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                KeyCode::Char('x') if self.notification.is_some() => {
                    return Ok(Some(Action::DismissNotice));
                }
                KeyCode::Char(n) => {
                    if let Some(route) = ScreenId::route_for_number(n) {
                        return Ok(Some(Action::Navigate(route)));
                    }
                }
                _ => {}
            }
        }

        match self.active_component() {
            Some(screen) => {
                trace!(screen = screen.id(), code = ?key.code, "key");
                screen.handle_key_event(key)
            }
            None => Ok(None),
        }
    }

    // ── Dispatch ────────────────────────────────────────────────

    fn send(&self, action: Action) {
        if self.action_tx.send(action).is_err() {
            warn!("action channel closed");
        }
    }

    fn send_all(&self, actions: Vec<Action>) {
        for action in actions {
            self.send(action);
        }
    }

    /// Surface whatever notice the médico list raised.
    fn forward_list_notice(&mut self) {
        if let Some(notice) = self.medicos.take_notice() {
            self.send(Action::Notify(notice));
        }
    }

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= AUTO_DISMISS)
                {
                    self.notification = None;
                }
                if let Some(screen) = self.active_component() {
                    if let Some(follow_up) = screen.update(&Action::Tick)? {
                        self.send(follow_up);
                    }
                }
            }

            Action::Navigate(route) => self.navigate(route),
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::LoadMedicos => self.spawn_load(),
            Action::SubmitClinica(mutation) => {
                let client = self.client.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = mutation.execute(&client).await;
                    let _ = tx.send(Action::ClinicaCompleted(mutation, result));
                });
            }
            Action::RequestDelete { id, nome } => {
                self.pending_confirm = Some(ConfirmAction::DeleteMedico { id, nome });
            }
            Action::ConfirmYes => {
                if let Some(ConfirmAction::DeleteMedico { id, .. }) = self.pending_confirm.take() {
                    self.spawn_delete(id);
                }
            }
            Action::ConfirmNo => {
                if let Some(confirm) = self.pending_confirm.take() {
                    debug!(%confirm, "declined");
                }
            }
            Action::CreateMedico(mut form) => {
                let client = self.client.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = form.submit(&client).await;
                    let _ = tx.send(Action::MedicoCreated(form, result));
                });
            }
            Action::UpdateMedico { id, fields } => {
                let client = self.client.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let result = medico_core::update_medico(&client, &id, &fields).await;
                    let _ = tx.send(Action::MedicoUpdated(id, result));
                });
            }

            Action::MedicosLoaded { generation, result } => {
                if generation == self.load_generation {
                    self.medicos.on_loaded(result);
                    debug!(count = self.medicos.list().medicos().len(), "médico list updated");
                    self.forward_list_notice();
                } else {
                    debug!(generation, "stale médico load dropped");
                }
            }
            Action::MedicoLoaded(id, result) => {
                if let Some(action) = self.form.as_mut().and_then(|f| f.on_loaded(&id, result)) {
                    self.send(action);
                }
            }
            Action::ClinicaCompleted(mutation, result) => {
                self.medicos.on_clinica_completed(&mutation, result);
                self.forward_list_notice();
            }
            Action::MedicoDeleted(id, result) => {
                self.medicos.on_deleted(&id, result);
                self.forward_list_notice();
            }
            Action::MedicoCreated(form, result) => {
                let actions = match self.form.as_mut() {
                    Some(screen) if screen.route() == Route::Create => {
                        screen.on_created(*form, result)
                    }
                    _ => medico_form::orphan_created(result),
                };
                self.send_all(actions);
            }
            Action::MedicoUpdated(id, result) => {
                let actions = match self.form.as_mut() {
                    Some(screen) if screen.route() == Route::Edit(id.clone()) => {
                        screen.on_updated(&id, result)
                    }
                    _ => medico_form::orphan_updated(result),
                };
                self.send_all(actions);
            }

            Action::Notify(notice) => {
                if notice.is_error() {
                    warn!(message = %notice.message, "error notice");
                }
                self.notification = Some((notice, Instant::now()));
            }
            Action::DismissNotice => self.notification = None,
        }
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────

    fn navigate(&mut self, route: Route) {
        if self.route == Route::List && route != Route::List {
            self.load_cancel.cancel();
            self.load_generation += 1;
        }
        if matches!(self.route, Route::Edit(_)) {
            self.form_cancel.cancel();
        }

        info!(from = %self.route, to = %route, "navigate");
        let form = match &route {
            Route::Create => Some(MedicoFormScreen::create()),
            Route::Edit(id) => {
                self.spawn_medico_load(id.clone());
                Some(MedicoFormScreen::edit(id.clone()))
            }
            Route::Home | Route::List => None,
        };
        self.form = form;
        let entering_list = route == Route::List;
        self.route = route;
        if entering_list {
            self.spawn_load();
        }
    }

    // ── Request tasks ───────────────────────────────────────────

    fn spawn_load(&mut self) {
        self.load_cancel.cancel();
        let cancel = CancellationToken::new();
        self.load_cancel = cancel.clone();
        self.load_generation += 1;
        let generation = self.load_generation;

        self.medicos.begin_load();
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => debug!(generation, "médico load cancelled"),
                result = fetch_medicos(&client) => {
                    let _ = tx.send(Action::MedicosLoaded { generation, result });
                }
            }
        });
    }

    fn spawn_medico_load(&mut self, id: Identifier) {
        self.form_cancel.cancel();
        let cancel = CancellationToken::new();
        self.form_cancel = cancel.clone();

        let client = self.client.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => debug!(medico_id = %id, "médico load cancelled"),
                result = fetch_medico(&client, &id) => {
                    let _ = tx.send(Action::MedicoLoaded(id, result));
                }
            }
        });
    }

    fn spawn_delete(&mut self, id: Identifier) {
        if let Err(e) = self.medicos.begin_delete(&id) {
            self.send(Action::Notify(Notice::from(&e)));
            return;
        }
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = client.delete_medico(&id).await.map_err(CoreError::from);
            let _ = tx.send(Action::MedicoDeleted(id, result));
        });
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        match self.active_screen() {
            ScreenId::Home => self.home.render(frame, content),
            ScreenId::Medicos => self.medicos.render(frame, content),
            ScreenId::Form => {
                if let Some(form) = &self.form {
                    form.render(frame, content);
                }
            }
        }

        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if let Some((notice, _)) = &self.notification {
            render_notification(frame, area, notice);
        }
        if let Some(confirm) = &self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.active_screen();
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .map(|&id| {
                let style = if id == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(ScreenId::TABS.iter().position(|&s| s == active));
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                format!("● {}", self.backend),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled(
                format!("  {}", self.route),
                Style::default().fg(theme::NEON_CYAN),
            ),
            Span::styled(" │ ? ajuda  x fechar aviso  q sair", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let dialog_area = centered(area, 60, 5);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Confirmar ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(
            format!("  {confirm}"),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirmar    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancelar", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notice: &Notice) {
    let msg_len = u16::try_from(notice.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (color, icon) = theme::notice_style(notice.level);

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notice.message.clone(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 58, 20);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Atalhos ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!(" {title}"),
            Style::default().fg(theme::ELECTRIC_PURPLE),
        ))
    };
    let row = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(desc, theme::key_hint()),
        ])
    };

    let lines = vec![
        section("Geral"),
        row("1 / 2", "Início / Médicos"),
        row("x", "Fechar aviso"),
        row("q, Ctrl-c", "Sair"),
        Line::from(""),
        section("Lista de médicos"),
        row("j / k", "Mover seleção"),
        row("Enter", "Abrir ou fechar clínicas"),
        row("n / e / d", "Novo, editar, excluir médico"),
        row("r", "Recarregar"),
        row("Tab", "Alternar lista e painel"),
        Line::from(""),
        section("Painel de clínicas"),
        row("e / a", "Editar clínica, adicionar clínica"),
        row("Enter", "Salvar"),
        row("Esc", "Cancelar edição"),
        Line::from(""),
        Line::from(Span::styled("  Esc ou ? para fechar", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
