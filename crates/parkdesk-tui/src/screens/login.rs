//! Login form. Holds the password only until the request is spawned.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use parkdesk_core::{Controller, messages};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Form, FormEvent};
use crate::widgets::popup;

fn empty_form() -> Form {
    Form::new(&[("Tên đăng nhập", ""), ("Mật khẩu", "")]).masked(1)
}

pub struct LoginScreen {
    controller: Controller,
    action_tx: Option<UnboundedSender<Action>>,
    form: Form,
    pending: bool,
}

impl LoginScreen {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            action_tx: None,
            form: empty_form(),
            pending: false,
        }
    }

    fn submit(&mut self) {
        if self.pending {
            return;
        }
        let username = self.form.value(0).to_owned();
        if username.is_empty() {
            self.form.set_error(messages::USERNAME_REQUIRED);
            return;
        }
        if self.form.value(1).is_empty() {
            self.form.set_error(messages::PASSWORD_REQUIRED);
            return;
        }
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let password = SecretString::from(self.form.value(1).to_owned());
        let controller = self.controller.clone();
        self.pending = true;

        tokio::spawn(async move {
            match controller.login(&username, &password).await {
                Ok(user) => {
                    info!(username = %username, "logged in");
                    let _ = tx.send(Action::Notify(Notification::success(
                        "Đăng nhập thành công",
                    )));
                    let _ = tx.send(Action::LoggedIn(user));
                }
                Err(e) => {
                    warn!(error = %e, "login failed");
                    let message = if e.is_auth() {
                        "Sai tên đăng nhập hoặc mật khẩu".to_owned()
                    } else {
                        e.user_message()
                    };
                    let _ = tx.send(Action::Notify(Notification::error(message)));
                    let _ = tx.send(Action::LoginFailed);
                }
            }
        });
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.form.handle_key(key) {
            FormEvent::Submit => self.submit(),
            FormEvent::Cancel => return Ok(Some(Action::Quit)),
            FormEvent::Consumed => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LoginFailed => {
                self.pending = false;
                self.form.clear(1);
            }
            Action::LoggedIn(_) | Action::Logout => {
                self.pending = false;
                self.form = empty_form();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let modal = popup::centered(area, 56, 10);
        let inner = popup::frame_modal(frame, modal, "Đăng nhập");
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(inner);

        let url = self.controller.config().url.to_string();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(url, theme::label()))),
            layout[0],
        );
        self.form.render(frame, layout[1]);

        let hint = if self.pending {
            Line::from(Span::styled("Đang đăng nhập...", theme::label()))
        } else {
            Line::from(vec![
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("đăng nhập  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("thoát", theme::key_hint()),
            ])
        };
        frame.render_widget(Paragraph::new(hint), layout[2]);
    }

    fn captures_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use parkdesk_core::ControllerConfig;

    fn screen() -> LoginScreen {
        let url = url::Url::parse("http://localhost:3000/api").unwrap();
        LoginScreen::new(Controller::new(ControllerConfig::new(url)).unwrap())
    }

    fn press(screen: &mut LoginScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn blank_fields_are_caught_before_any_request() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.form.error(), Some(messages::USERNAME_REQUIRED));

        for c in "admin".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.form.error(), Some(messages::PASSWORD_REQUIRED));
        assert!(!screen.pending);
    }

    #[test]
    fn failed_login_clears_only_the_password() {
        let mut screen = screen();
        for c in "admin".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        press(&mut screen, KeyCode::Tab);
        press(&mut screen, KeyCode::Char('x'));
        screen.update(&Action::LoginFailed).unwrap();
        assert_eq!(screen.form.value(0), "admin");
        assert_eq!(screen.form.value(1), "");
    }

    #[test]
    fn esc_quits() {
        let mut screen = screen();
        assert!(matches!(press(&mut screen, KeyCode::Esc), Some(Action::Quit)));
    }
}
