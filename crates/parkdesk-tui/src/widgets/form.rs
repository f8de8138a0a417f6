//! Multi-field text form on top of `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_input::{Input, InputRequest};

use crate::theme;

/// What a key did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
    Consumed,
}

#[derive(Debug, Clone)]
struct Field {
    label: &'static str,
    input: Input,
    masked: bool,
}

#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
    error: Option<String>,
}

impl Form {
    /// Fields as `(label, initial value)`.
    pub fn new(fields: &[(&'static str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|&(label, value)| Field {
                    label,
                    input: Input::new(value.to_owned()),
                    masked: false,
                })
                .collect(),
            focus: 0,
            error: None,
        }
    }

    /// Render field `idx` as bullets.
    #[must_use]
    pub fn masked(mut self, idx: usize) -> Self {
        if let Some(f) = self.fields.get_mut(idx) {
            f.masked = true;
        }
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Trimmed value of field `idx`.
    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |f| f.input.value().trim())
    }

    /// `None` for a blank field.
    pub fn opt(&self, idx: usize) -> Option<String> {
        Some(self.value(idx))
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    }

    /// Empty field `idx` and move focus to it.
    pub fn clear(&mut self, idx: usize) {
        if let Some(f) = self.fields.get_mut(idx) {
            f.input.reset();
            self.focus = idx;
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let request = match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len().max(1);
                return FormEvent::Consumed;
            }
            KeyCode::BackTab | KeyCode::Up => {
                let n = self.fields.len().max(1);
                self.focus = (self.focus + n - 1) % n;
                return FormEvent::Consumed;
            }
            KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
            KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Char(c) if !ctrl => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return FormEvent::Consumed,
        };
        if let Some(field) = self.fields.get_mut(self.focus) {
            let _ = field.input.handle(request);
            self.error = None;
        }
        FormEvent::Consumed
    }

    /// One line per field, then the error line. Places the cursor on the
    /// focused field.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let label_width = self
            .fields
            .iter()
            .map(|f| f.label.chars().count())
            .max()
            .unwrap_or(0)
            + 2;

        let mut lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let shown = if f.masked {
                    "•".repeat(f.input.value().chars().count())
                } else {
                    f.input.value().to_owned()
                };
                let label_style = if i == self.focus {
                    theme::key_hint_key()
                } else {
                    theme::label()
                };
                Line::from(vec![
                    Span::styled(format!("{:<label_width$}", f.label), label_style),
                    Span::styled(shown, theme::table_row()),
                ])
            })
            .collect();

        if let Some(ref err) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(err.clone(), theme::error_text())));
        }

        frame.render_widget(Paragraph::new(lines), area);

        if let Some(field) = self.fields.get(self.focus) {
            let offset = u16::try_from(label_width + field.input.visual_cursor()).unwrap_or(0);
            let row = u16::try_from(self.focus).unwrap_or(0);
            if row < area.height {
                frame.set_cursor_position(Position::new(
                    (area.x + offset).min(area.right().saturating_sub(1)),
                    area.y + row,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = Form::new(&[("Biển số", ""), ("Số tháng", "1")]);
        type_text(&mut form, "51A-123.45");
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Backspace));
        type_text(&mut form, "3");
        assert_eq!(form.value(0), "51A-123.45");
        assert_eq!(form.value(1), "3");
    }

    #[test]
    fn blank_fields_are_none() {
        let mut form = Form::new(&[("Ghi chú", "  ")]);
        assert_eq!(form.opt(0), None);
        type_text(&mut form, "x");
        assert_eq!(form.opt(0).as_deref(), Some("x"));
    }

    #[test]
    fn enter_and_esc_end_the_form() {
        let mut form = Form::new(&[("A", "")]);
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancel);
    }

    #[test]
    fn editing_clears_the_error() {
        let mut form = Form::new(&[("A", "")]);
        form.set_error("Vui lòng nhập");
        assert!(form.error().is_some());
        type_text(&mut form, "a");
        assert!(form.error().is_none());
    }

    #[test]
    fn focus_wraps_backwards() {
        let mut form = Form::new(&[("A", ""), ("B", "")]);
        form.handle_key(key(KeyCode::Up));
        type_text(&mut form, "b");
        assert_eq!(form.value(1), "b");
        assert_eq!(form.field_count(), 2);
    }
}
