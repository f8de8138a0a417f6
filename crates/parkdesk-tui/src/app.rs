//! Application core: event loop, screen management, action dispatch and
//! the bridge from actions to controller calls.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use parkdesk_core::{Command, Controller, CoreError, SessionUser};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader, Pacing};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::popup;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Logged-in user shown in the status bar.
    session: Option<SessionUser>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    /// Starts on the login form unless the controller already holds a token.
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&controller).into_iter().collect();
        let active_screen = if controller.is_authenticated() {
            ScreenId::Dashboard
        } else {
            ScreenId::Login
        };

        Self {
            active_screen,
            screens,
            running: true,
            help_visible: false,
            session: None,
            action_tx,
            action_rx,
            controller,
            pending_confirm: None,
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // A stored token skips the login form; screens load their data.
        if self.active_screen != ScreenId::Login {
            self.action_tx
                .send(Action::LoggedIn(self.controller.session_user()))?;
        }

        let mut events = EventReader::spawn(Pacing::default());

        info!("TUI event loop started");

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
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Global keys are handled here; everything else goes to the active
    /// screen. A screen with an open form or modal gets every key.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
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

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('L')) => {
                return Ok(Some(Action::Logout));
            }
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='4')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(target) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        screen.handle_key_event(key)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render | Action::Resize(..) => {}
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::SwitchScreen(target) => {
                if self.active_screen != ScreenId::Login {
                    self.switch_to(*target);
                }
            }

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, at)| at.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                // Throbbers animate on ticks.
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.update(action)?;
                }
            }

            // ── Session ──────────────────────────────────────────────
            Action::LoggedIn(user) => {
                info!("session started");
                self.session.clone_from(user);
                if self.active_screen == ScreenId::Login {
                    self.switch_to(ScreenId::Dashboard);
                }
                self.broadcast(action)?;
            }
            Action::Logout => {
                self.controller.logout();
                self.session = None;
                self.pending_confirm = None;
                self.help_visible = false;
                self.switch_to(ScreenId::Login);
                self.broadcast(action)?;
            }

            // ── Fetch requests ───────────────────────────────────────
            Action::FetchDashboard => {
                self.spawn_fetch(
                    |c| async move { c.dashboard().await },
                    Action::DashboardLoaded,
                );
            }
            Action::FetchRegistrations { created } => {
                let created = created.clone();
                self.spawn_fetch(
                    |c| async move { c.registrations().await },
                    move |result| Action::RegistrationsLoaded { result, created },
                );
            }
            Action::SearchRegistrations(query) => {
                let query = query.clone();
                self.spawn_fetch(
                    |c| async move { c.search_registrations(&query).await },
                    Action::SearchLoaded,
                );
            }
            Action::FetchUsers => {
                self.spawn_fetch(|c| async move { c.users().await }, Action::UsersLoaded);
            }
            Action::FetchVehicles => {
                self.spawn_fetch(
                    |c| async move { tokio::try_join!(c.vehicles(), c.vehicle_types()) },
                    Action::VehiclesLoaded,
                );
            }
            Action::CheckActive(plate) => {
                let plate = plate.clone();
                self.spawn_fetch(
                    |c| async move { c.check_active(&plate).await },
                    Action::ActiveChecked,
                );
            }
            Action::FetchActive(plate) => {
                let plate = plate.clone();
                self.spawn_fetch(
                    |c| async move { c.active_registration(&plate).await },
                    Action::ActiveLoaded,
                );
            }
            Action::FetchChain(id) => {
                let id = id.clone();
                self.spawn_fetch(
                    |c| async move { c.extension_chain(&id).await },
                    Action::ChainLoaded,
                );
            }
            Action::FetchHistory(plate) => {
                let plate = plate.clone();
                self.spawn_fetch(
                    |c| async move { c.vehicle_history(&plate).await },
                    Action::HistoryLoaded,
                );
            }

            // Results go to every screen so they stay in sync.
            Action::LoginFailed
            | Action::DashboardLoaded(_)
            | Action::RegistrationsLoaded { .. }
            | Action::SearchLoaded(_)
            | Action::UsersLoaded(_)
            | Action::VehiclesLoaded(_)
            | Action::ActiveChecked(_)
            | Action::ActiveLoaded(_)
            | Action::ChainLoaded(_)
            | Action::HistoryLoaded(_)
            | Action::CommandSucceeded { .. }
            | Action::CommandFailed { .. } => self.broadcast(action)?,

            // ── Commands ─────────────────────────────────────────────
            Action::Execute { origin, command } => {
                self.execute_command(*origin, (**command).clone());
            }
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_command(confirm.origin, *confirm.command);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
        }
        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Run a read in the background and post its result. An expired
    /// session also logs out.
    fn spawn_fetch<T, F, Fut, W>(&self, fetch: F, wrap: W)
    where
        T: Send + 'static,
        F: FnOnce(Controller) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
        W: FnOnce(Result<T, CoreError>) -> Action + Send + 'static,
    {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = fetch(controller).await;
            let expired = matches!(&result, Err(e) if e.is_auth());
            if let Err(ref e) = result {
                warn!(error = %e, "fetch failed");
            }
            let _ = tx.send(wrap(result));
            if expired {
                let _ = tx.send(Action::Logout);
            }
        });
    }

    fn execute_command(&self, origin: ScreenId, cmd: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let success_msg = cmd.success_message();
        tokio::spawn(async move {
            match controller.execute(cmd).await {
                Ok(result) => {
                    let _ = tx.send(Action::Notify(Notification::success(success_msg)));
                    let _ = tx.send(Action::CommandSucceeded { origin, result });
                }
                Err(e) => {
                    warn!(error = %e, "command execution failed");
                    let _ = tx.send(Action::Notify(Notification::error(e.user_message())));
                    let _ = tx.send(Action::CommandFailed { origin });
                    if e.is_auth() {
                        let _ = tx.send(Action::Logout);
                    }
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.active_screen == ScreenId::Login {
            if let Some(screen) = self.screens.get(&ScreenId::Login) {
                screen.render(frame, area);
            }
        } else {
            let layout = Layout::vertical([
                Constraint::Min(1),    // Screen content
                Constraint::Length(1), // Tab bar
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            if let Some(screen) = self.screens.get(&self.active_screen) {
                screen.render(frame, layout[0]);
            }
            self.render_tab_bar(frame, layout[1]);
            self.render_status_bar(frame, layout[2]);
        }

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
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
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let who = self
            .session
            .as_ref()
            .and_then(|s| s.full_name.clone().or_else(|| s.username.clone()))
            .unwrap_or_else(|| "đã đăng nhập".into());
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("● {who}"), Style::default().fg(theme::GREEN)),
            Span::styled(
                format!("  {}", self.controller.config().url),
                theme::label(),
            ),
            Span::styled(" │ ? trợ giúp  L đăng xuất  q thoát", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn help_line(key: &'static str, text: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
        Span::styled(text, theme::key_hint()),
    ])
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = popup::centered(area, 60, 24);
    let inner = popup::frame_modal(frame, help_area, "Phím tắt");

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::TEAL),
        ))
    };
    let help_text = vec![
        section("Điều hướng"),
        help_line("1-4 Tab", "Chuyển màn hình"),
        help_line("j/k ↑/↓", "Chọn dòng"),
        help_line("[ ]", "Trang trước / sau"),
        help_line("Enter", "Chi tiết"),
        help_line("r", "Tải lại"),
        Line::from(""),
        section("Đăng ký tháng"),
        help_line("a / u", "Thêm mới / cho khách cũ"),
        help_line("e", "Sửa (Ctrl+X hủy đăng ký)"),
        help_line("x / s", "Gia hạn / gia hạn thông minh"),
        help_line("p", "Thanh toán"),
        help_line("m", "Cập nhật số tháng"),
        help_line("l / h", "Chuỗi gia hạn / lịch sử xe"),
        help_line("c / v", "Kiểm tra / xem vé đang hoạt động"),
        help_line("U", "Cập nhật đăng ký hết hạn"),
        help_line("d", "Xóa"),
        help_line("/", "Tìm kiếm (Tab đổi trường)"),
        Line::from(""),
        section("Chung"),
        help_line("L", "Đăng xuất"),
        help_line("q Ctrl+C", "Thoát"),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let dialog_area = popup::centered(area, 56, 5);
    frame.render_widget(ratatui::widgets::Clear, dialog_area);

    let block = Block::default()
        .title(" Xác nhận ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::YELLOW))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(
            format!("  {confirm}"),
            Style::default().fg(theme::TEXT),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("đồng ý    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("hủy", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::GREEN, "✓"),
        NotificationLevel::Error => (theme::RED, "✗"),
        NotificationLevel::Info => (theme::SKY, "·"),
    };

    frame.render_widget(ratatui::widgets::Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::TEXT)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parkdesk_core::{CommandResult, ControllerConfig, RecordId};

    fn app() -> App {
        let url = url::Url::parse("http://localhost:3000/api").unwrap();
        App::new(Controller::new(ControllerConfig::new(url)).unwrap())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_on_login_without_a_token() {
        let mut app = app();
        assert_eq!(app.active_screen, ScreenId::Login);
        // Login owns the keyboard: 'q' is text, tab switching is blocked.
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        app.process_action(&Action::SwitchScreen(ScreenId::Users))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::Login);
    }

    #[tokio::test]
    async fn login_moves_to_the_dashboard_and_fetches() {
        let mut app = app();
        app.process_action(&Action::LoggedIn(None)).unwrap();
        assert_eq!(app.active_screen, ScreenId::Dashboard);

        let mut follow_ups = Vec::new();
        while let Ok(a) = app.action_rx.try_recv() {
            follow_ups.push(a);
        }
        assert!(follow_ups.iter().any(|a| matches!(a, Action::FetchDashboard)));
        assert!(follow_ups.iter().any(|a| matches!(a, Action::FetchUsers)));
        assert!(
            follow_ups
                .iter()
                .any(|a| matches!(a, Action::FetchRegistrations { .. }))
        );
    }

    #[test]
    fn confirm_dialog_captures_keys() {
        let mut app = app();
        app.process_action(&Action::ShowConfirm(ConfirmAction {
            prompt: "Xóa?".into(),
            origin: ScreenId::Users,
            command: Box::new(Command::DeleteUser {
                id: RecordId::Num(1),
            }),
        }))
        .unwrap();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ConfirmNo)
        ));
        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
    }

    #[test]
    fn results_reach_screens_that_are_not_active() {
        let mut app = app();
        app.process_action(&Action::CommandSucceeded {
            origin: ScreenId::Vehicles,
            result: CommandResult::Ok,
        })
        .unwrap();
        assert!(matches!(
            app.action_rx.try_recv(),
            Ok(Action::FetchVehicles)
        ));
    }
}
