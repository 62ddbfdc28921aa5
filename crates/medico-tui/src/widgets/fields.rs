//! Labelled text fields for the médico and clínica forms.

use crossterm::event::KeyCode;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use medico_core::{ClinicaFields, MedicoFields};

use crate::theme;

pub const MEDICO_LABELS: [&str; 3] = ["Nome", "CRM", "Especialidade"];
pub const CLINICA_LABELS: [&str; 3] = ["Razão Social", "CEP", "CNPJ"];

pub fn medico_field(fields: &mut MedicoFields, idx: usize) -> Option<&mut String> {
    match idx {
        0 => Some(&mut fields.nome),
        1 => Some(&mut fields.crm),
        2 => Some(&mut fields.especialidade),
        _ => None,
    }
}

pub fn medico_values(fields: &MedicoFields) -> [&str; 3] {
    [&fields.nome, &fields.crm, &fields.especialidade]
}

pub fn clinica_field(fields: &mut ClinicaFields, idx: usize) -> Option<&mut String> {
    match idx {
        0 => Some(&mut fields.razao_social),
        1 => Some(&mut fields.cep),
        2 => Some(&mut fields.cnpj),
        _ => None,
    }
}

pub fn clinica_values(fields: &ClinicaFields) -> [&str; 3] {
    [&fields.razao_social, &fields.cep, &fields.cnpj]
}

/// Apply a typing key to `target`. Returns whether the key was consumed.
pub fn edit_text(target: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(ch) => {
            target.push(ch);
            true
        }
        KeyCode::Backspace => {
            target.pop();
            true
        }
        _ => false,
    }
}

/// Step a field index forward or back, wrapping within `count`.
pub fn step(idx: usize, count: usize, forward: bool) -> usize {
    if count == 0 {
        return 0;
    }
    if forward {
        (idx + 1) % count
    } else {
        (idx + count - 1) % count
    }
}

/// One form line: marker, padded label, value and a cursor when focused.
pub fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = theme::field_label(focused);
    let marker = if focused { "▸ " } else { "  " };
    let cursor = if focused { "▎" } else { "" };
    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{label:<15}"), label_style),
        Span::styled(value.to_owned(), theme::field_value()),
        Span::styled(cursor, Style::default().fg(theme::ELECTRIC_YELLOW)),
    ])
}

/// Lines for a run of fields; `focused` is relative to `labels`.
pub fn field_lines(labels: &[&str], values: &[&str], focused: Option<usize>) -> Vec<Line<'static>> {
    labels
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (label, value))| field_line(label, value, focused == Some(idx)))
        .collect()
}

/// A key hint row built from `(key, description)` pairs.
pub fn hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled((*desc).to_owned(), theme::key_hint()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace() {
        let mut value = String::from("Clin");
        assert!(edit_text(&mut value, KeyCode::Char('a')));
        assert_eq!(value, "Clina");
        assert!(edit_text(&mut value, KeyCode::Backspace));
        assert!(edit_text(&mut value, KeyCode::Backspace));
        assert_eq!(value, "Cli");
        assert!(!edit_text(&mut value, KeyCode::Enter));
    }

    #[test]
    fn step_wraps_both_ways() {
        assert_eq!(step(2, 3, true), 0);
        assert_eq!(step(0, 3, false), 2);
        assert_eq!(step(0, 0, true), 0);
    }

    #[test]
    fn field_accessors_cover_every_label() {
        let mut clinica = ClinicaFields::default();
        for idx in 0..CLINICA_LABELS.len() {
            if let Some(value) = clinica_field(&mut clinica, idx) {
                value.push('x');
            }
        }
        assert_eq!(clinica_values(&clinica), ["x", "x", "x"]);
        assert!(clinica_field(&mut clinica, 3).is_none());

        let mut medico = MedicoFields::default();
        if let Some(v) = medico_field(&mut medico, 2) {
            v.push_str("Cardio");
        }
        assert_eq!(medico.especialidade, "Cardio");
    }
}
