//! Customer directory with a detail pane and delete.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use parkdesk_core::{Command, User};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

pub struct UsersScreen {
    focused: bool,
    users: Vec<User>,
    table_state: TableState,
    detail_open: bool,
    loading: bool,
}

impl UsersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            users: Vec::new(),
            table_state: TableState::default(),
            detail_open: false,
            loading: false,
        }
    }

    fn selected(&self) -> Option<&User> {
        self.table_state.selected().and_then(|i| self.users.get(i))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.users.is_empty() {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.users.len() - 1);
        self.table_state.select(Some(next));
    }

    fn refresh(&mut self) -> Option<Action> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(Action::FetchUsers)
    }
}

fn render_detail(frame: &mut Frame, area: Rect, user: &User) {
    let block = Block::default()
        .title(" Chi tiết khách hàng ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = [
        ("Mã", Some(user.id.to_string())),
        ("Họ tên", user.full_name.clone()),
        ("CCCD", user.cccd.clone()),
        ("Điện thoại", user.phone.clone()),
        ("Email", user.email.clone()),
        ("Mã nhân viên", user.employee_code.clone()),
        ("Trạng thái", user.status.clone()),
    ];
    let lines: Vec<Line> = fields
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<14}"), theme::label()),
                Span::styled(value.unwrap_or_default(), theme::table_row()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

impl Component for UsersScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter => self.detail_open = !self.detail_open && self.selected().is_some(),
            KeyCode::Esc => self.detail_open = false,
            KeyCode::Char('r') => return Ok(self.refresh()),
            KeyCode::Char('d') => {
                let Some(user) = self.selected() else {
                    return Ok(None);
                };
                let name = user.full_name.clone().unwrap_or_else(|| user.id.to_string());
                return Ok(Some(Action::ShowConfirm(ConfirmAction {
                    prompt: format!("Xóa khách hàng {name}?"),
                    origin: ScreenId::Users,
                    command: Box::new(Command::DeleteUser {
                        id: user.id.clone(),
                    }),
                })));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoggedIn(_) => return Ok(self.refresh()),
            Action::UsersLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(users) => {
                        self.users.clone_from(users);
                        self.move_selection(0);
                    }
                    Err(_) => return Ok(Action::failure(result)),
                }
            }
            Action::CommandSucceeded {
                origin: ScreenId::Users,
                ..
            } => {
                self.detail_open = false;
                return Ok(self.refresh());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Khách hàng ({}) ", self.users.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = self.selected().filter(|_| self.detail_open);
        let (table_area, detail_area) = if detail.is_some() {
            let chunks = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(table_area);

        let header = Row::new(
            ["#", "Họ tên", "CCCD", "Điện thoại", "Mã NV"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .users
            .iter()
            .map(|u| {
                Row::new(vec![
                    Cell::from(u.id.to_string()),
                    Cell::from(u.full_name.clone().unwrap_or_default()),
                    Cell::from(u.cccd.clone().unwrap_or_default()),
                    Cell::from(u.phone.clone().unwrap_or_default()),
                    Cell::from(u.employee_code.clone().unwrap_or_default()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let widths = [
            Constraint::Length(6),
            Constraint::Fill(2),
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("chọn  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("chi tiết  ", theme::key_hint()),
            Span::styled("d ", theme::key_hint_key()),
            Span::styled("xóa  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("tải lại", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);

        if let (Some(user), Some(area)) = (detail, detail_area) {
            render_detail(frame, area, user);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use parkdesk_core::RecordId;

    fn user(id: i64) -> User {
        User {
            id: RecordId::Num(id),
            full_name: Some(format!("Khách {id}")),
            cccd: None,
            phone: None,
            email: None,
            employee_code: None,
            status: None,
        }
    }

    #[test]
    fn delete_confirms_the_selected_user() {
        let mut screen = UsersScreen::new();
        screen
            .update(&Action::UsersLoaded(Ok(vec![user(1), user(2)])))
            .unwrap();
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ref c))
                if matches!(*c.command, Command::DeleteUser { id: RecordId::Num(2) })
        ));
    }

    #[test]
    fn success_refetches() {
        let mut screen = UsersScreen::new();
        let follow = screen
            .update(&Action::CommandSucceeded {
                origin: ScreenId::Users,
                result: parkdesk_core::CommandResult::Ok,
            })
            .unwrap();
        assert!(matches!(follow, Some(Action::FetchUsers)));
    }
}
