//! Landing screen: a two-entry menu.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use medico_core::Route;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fields;

const ENTRIES: [(&str, Route); 2] = [
    ("Médicos", Route::List),
    ("Cadastrar um Médico", Route::Create),
];

#[derive(Debug, Default)]
pub struct HomeScreen {
    selected: usize,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for HomeScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = fields::step(self.selected, ENTRIES.len(), true);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = fields::step(self.selected, ENTRIES.len(), false);
                Ok(None)
            }
            KeyCode::Enter => Ok(ENTRIES
                .get(self.selected)
                .map(|(_, route)| Action::Navigate(route.clone()))),
            _ => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [column] = Layout::horizontal([Constraint::Length(40)])
            .flex(Flex::Center)
            .areas(area);
        let [card] = Layout::vertical([Constraint::Length(8)])
            .flex(Flex::Center)
            .areas(column);

        let block = Block::default()
            .title(" Cadastro de Médicos ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let mut lines = vec![Line::from("")];
        for (idx, (label, _)) in ENTRIES.iter().enumerate() {
            let selected = idx == self.selected;
            let style = if selected {
                theme::table_selected()
            } else {
                theme::table_row()
            };
            let marker = if selected { " ▸ " } else { "   " };
            lines.push(Line::from(Span::styled(format!("{marker}{label}"), style)));
        }
        lines.push(Line::from(""));
        lines.push(fields::hints(&[("j/k", "mover"), ("Enter", "abrir")]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn id(&self) -> &'static str {
        "Home"
    }
}
