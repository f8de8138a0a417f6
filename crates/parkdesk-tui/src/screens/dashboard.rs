//! Overview: who is logged in, their vehicles, and pass counts by status.

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use parkdesk_core::{Registration, RegistrationStatus, SessionUser, UserDashboard};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct DashboardScreen {
    focused: bool,
    session: Option<SessionUser>,
    data: Option<UserDashboard>,
    loading: bool,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            session: None,
            data: None,
            loading: false,
        }
    }

    fn refresh(&mut self) -> Option<Action> {
        if self.loading {
            return None;
        }
        self.loading = true;
        Some(Action::FetchDashboard)
    }

    fn block(&self, title: &str) -> Block<'static> {
        Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_profile(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("Tài khoản");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        if let Some(ref s) = self.session {
            lines.push(kv("Đăng nhập", s.username.clone().unwrap_or_default()));
            if let Some(ref role) = s.role {
                let role = role.as_str().map_or_else(|| role.to_string(), str::to_owned);
                lines.push(kv("Vai trò", role));
            }
        }
        if let Some(user) = self.data.as_ref().and_then(|d| d.user.as_ref()) {
            lines.push(kv("Họ tên", user.full_name.clone().unwrap_or_default()));
            lines.push(kv("CCCD", user.cccd.clone().unwrap_or_default()));
            lines.push(kv("Điện thoại", user.phone.clone().unwrap_or_default()));
        }
        if self.loading {
            lines.push(Line::from(Span::styled("Đang tải...", theme::label())));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_counts(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("Vé tháng");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let regs = self.data.as_ref().map_or(&[][..], |d| &d.registrations[..]);
        let lines: Vec<Line> = [
            RegistrationStatus::Active,
            RegistrationStatus::Pending,
            RegistrationStatus::Expired,
            RegistrationStatus::Cancelled,
        ]
        .into_iter()
        .map(|status| {
            Line::from(vec![
                Span::styled(format!("{:<14}", status.label_vi()), theme::status_style(status)),
                Span::styled(count(regs, status).to_string(), theme::table_row()),
            ])
        })
        .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_passes(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("Đăng ký của tôi");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let now = Utc::now();
        let header = Row::new(
            ["Biển số", "Hết hạn", "Còn lại", "Trạng thái"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .data
            .iter()
            .flat_map(|d| d.registrations.iter())
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.plate.clone()).style(Style::default().fg(theme::SKY)),
                    Cell::from(
                        r.expires_at
                            .map(|d| d.format("%d/%m/%Y").to_string())
                            .unwrap_or_default(),
                    ),
                    Cell::from(
                        r.days_remaining(now)
                            .map(|d| format!("{d} ngày"))
                            .unwrap_or_default(),
                    ),
                    Cell::from(r.status.label_vi()).style(theme::status_style(r.status)),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Fill(1),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), inner);
    }

    fn render_vehicles(&self, frame: &mut Frame, area: Rect) {
        let block = self.block("Xe của tôi");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = self
            .data
            .iter()
            .flat_map(|d| d.vehicles.iter())
            .map(|v| {
                Line::from(vec![
                    Span::styled(format!("{:<14}", v.plate), Style::default().fg(theme::SKY)),
                    Span::styled(
                        v.vehicle_type_name.clone().unwrap_or_default(),
                        theme::label(),
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn kv(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), theme::label()),
        Span::styled(value, theme::table_row()),
    ])
}

fn count(regs: &[Registration], status: RegistrationStatus) -> usize {
    regs.iter().filter(|r| r.status == status).count()
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('r') => Ok(self.refresh()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoggedIn(user) => {
                self.session.clone_from(user);
                return Ok(self.refresh());
            }
            Action::Logout => {
                self.session = None;
                self.data = None;
            }
            Action::DashboardLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(data) => self.data = Some(data.clone()),
                    Err(_) => return Ok(Action::failure(result)),
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(8), Constraint::Min(4)]).split(area);
        let top = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);
        let bottom = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        self.render_profile(frame, top[0]);
        self.render_counts(frame, top[1]);
        self.render_passes(frame, bottom[0]);
        self.render_vehicles(frame, bottom[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parkdesk_core::CoreError;

    #[test]
    fn refresh_is_not_repeated_while_loading() {
        let mut screen = DashboardScreen::new();
        assert!(matches!(
            screen.update(&Action::LoggedIn(None)).unwrap(),
            Some(Action::FetchDashboard)
        ));
        assert!(screen.refresh().is_none());
        let toast = screen
            .update(&Action::DashboardLoaded(Err(CoreError::Timeout)))
            .unwrap();
        assert!(matches!(toast, Some(Action::Notify(_))));
        assert!(screen.refresh().is_some());
    }
}
