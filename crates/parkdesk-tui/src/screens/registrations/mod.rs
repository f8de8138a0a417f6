//! Monthly registrations: the paged list, search, and every lifecycle
//! modal (add, edit, extend, pay, cancel, chain and history lookups).

mod forms;
mod render;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use throbber_widgets_tui::ThrobberState;
use tui_input::{Input, InputRequest};

use parkdesk_core::{
    ActiveCheck, Command, CoreError, PaymentRequest, REGISTRATION_PAGE_SIZE, RecordId,
    Registration, RegistrationView, SearchField, SearchPlan, SearchQuery, UiMode,
};

use crate::action::{Action, ConfirmAction, Notification};
use crate::component::Component;
use crate::screen::ScreenId;
use crate::widgets::form::{Form, FormEvent};

/// Search box state while `/` is open.
#[derive(Debug, Clone, Default)]
struct SearchBox {
    field: SearchField,
    input: Input,
}

/// Result area of the lookup modals.
#[derive(Debug, Clone, Default)]
enum Lookup {
    #[default]
    Idle,
    Loading,
    Active(ActiveCheck),
    ActiveRow(Option<Registration>),
    Rows(Vec<Registration>),
    Failed(String),
}

pub struct RegistrationsScreen {
    focused: bool,
    view: RegistrationView,
    table_state: TableState,
    search: Option<SearchBox>,
    form: Option<Form>,
    lookup: Lookup,
    throbber: ThrobberState,
    /// A command for this screen is running; further submits are ignored.
    in_flight: bool,
}

impl RegistrationsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            view: RegistrationView::new(REGISTRATION_PAGE_SIZE),
            table_state: TableState::default(),
            search: None,
            form: None,
            lookup: Lookup::Idle,
            throbber: ThrobberState::default(),
            in_flight: false,
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    fn selected(&self) -> Option<&Registration> {
        self.view
            .page_rows()
            .get(self.table_state.selected().unwrap_or(0))
    }

    fn selected_id(&self) -> Option<RecordId> {
        self.selected().map(|r| r.id.clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view.page_rows().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn reset_selection(&mut self) {
        let first = (!self.view.page_rows().is_empty()).then_some(0);
        self.table_state.select(first);
    }

    fn select_row(&mut self, id: &RecordId) {
        match self.view.page_rows().iter().position(|r| &r.id == id) {
            Some(pos) => self.table_state.select(Some(pos)),
            None => self.reset_selection(),
        }
    }

    // ── Requests ─────────────────────────────────────────────────────

    fn refresh(&mut self) -> Option<Action> {
        if self.view.is_busy() {
            return None;
        }
        self.view.begin_fetch();
        Some(Action::FetchRegistrations { created: None })
    }

    fn row_box(&self, id: &RecordId) -> Result<Box<Registration>, CoreError> {
        self.view
            .find(id)
            .cloned()
            .map(Box::new)
            .ok_or_else(|| CoreError::not_found("đăng ký", id))
    }

    /// Destructive commands go through the confirm dialog first.
    fn execute(&mut self, command: Command) -> Action {
        if command.is_destructive() {
            let prompt = match &command {
                Command::CancelRegistration { registration } => {
                    format!("Hủy đăng ký xe {}?", registration.plate)
                }
                Command::DeleteRegistration { id } => format!("Xóa đăng ký #{id}?"),
                _ => "Xác nhận thao tác?".to_owned(),
            };
            return Self::confirm(prompt, command);
        }
        self.in_flight = true;
        Action::Execute {
            origin: ScreenId::Registrations,
            command: Box::new(command),
        }
    }

    fn confirm(prompt: String, command: Command) -> Action {
        Action::ShowConfirm(ConfirmAction {
            prompt,
            origin: ScreenId::Registrations,
            command: Box::new(command),
        })
    }

    // ── Modals ───────────────────────────────────────────────────────

    fn open(&mut self, mode: UiMode) -> Option<Action> {
        if let Err(e) = self.view.open(mode.clone()) {
            return Some(toast(&e));
        }
        let row = mode.row().and_then(|id| self.view.find(id));
        self.form = forms::form_for(&mode, row);
        self.lookup = Lookup::Idle;
        match mode {
            UiMode::ViewActive(plate) => {
                self.lookup = Lookup::Loading;
                Some(Action::FetchActive(plate))
            }
            UiMode::ExtensionChain(id) => {
                let local: Vec<Registration> =
                    self.view.local_chain(&id).into_iter().cloned().collect();
                self.lookup = Lookup::Rows(local);
                Some(Action::FetchChain(id))
            }
            UiMode::VehicleHistory(plate) => {
                self.lookup = Lookup::Loading;
                Some(Action::FetchHistory(plate))
            }
            _ => None,
        }
    }

    fn close(&mut self) {
        self.view.close();
        self.form = None;
        self.lookup = Lookup::Idle;
    }

    /// Validate the open form and turn it into a request.
    fn submit(&mut self) -> Option<Action> {
        if self.in_flight {
            return None;
        }
        let form = self.form.as_ref()?;
        let built = match self.view.mode().clone() {
            UiMode::Add => forms::create(form).map(Command::CreateRegistration),
            UiMode::ExistingUser => forms::existing_user(form).map(Command::CreateForExistingUser),
            UiMode::Edit(id) => self.row_box(&id).and_then(|row| {
                forms::update(form, &row).map(|update| Command::UpdateRegistration { id, update })
            }),
            UiMode::Extend(id) => self.row_box(&id).and_then(|registration| {
                forms::extend(form).map(|request| Command::ExtendRegistration {
                    registration,
                    request,
                })
            }),
            UiMode::SmartExtend(id) => self.row_box(&id).and_then(|registration| {
                forms::extend(form).map(|request| Command::SmartExtend {
                    registration,
                    request,
                })
            }),
            UiMode::UpdateMonths(id) => forms::months(form.value(0)).and_then(|months| {
                self.view.validate_update_months(&id, months)?;
                Ok(Command::UpdateMonths {
                    registration: self.row_box(&id)?,
                    months,
                })
            }),
            UiMode::CheckActive => {
                let plate = form.value(0).to_owned();
                if plate.is_empty() {
                    self.set_form_error(parkdesk_core::messages::PLATE_REQUIRED);
                    return None;
                }
                self.lookup = Lookup::Loading;
                return Some(Action::CheckActive(plate));
            }
            _ => return None,
        };
        match built {
            Ok(command) => Some(self.execute(command)),
            Err(e) => {
                self.set_form_error(e.user_message());
                None
            }
        }
    }

    fn set_form_error(&mut self, message: impl Into<String>) {
        if let Some(form) = self.form.as_mut() {
            form.set_error(message);
        }
    }

    // ── Key handling ─────────────────────────────────────────────────

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        let search = self.search.as_mut()?;
        let request = match key.code {
            KeyCode::Esc => {
                self.search = None;
                return None;
            }
            KeyCode::Tab => {
                search.field = search.field.next();
                return None;
            }
            KeyCode::Enter => {
                let query = SearchQuery::new(search.field, search.input.value().trim());
                self.search = None;
                return match self.view.begin_search(query) {
                    SearchPlan::Restore => {
                        self.reset_selection();
                        None
                    }
                    SearchPlan::Fetch(query) => Some(Action::SearchRegistrations(query)),
                };
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                InputRequest::DeleteLine
            }
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            _ => return None,
        };
        let _ = search.input.handle(request);
        None
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Ctrl+X in the edit modal cancels the registration itself.
        if let UiMode::Edit(id) = self.view.mode().clone() {
            if key.code == KeyCode::Char('x') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return match self.row_box(&id) {
                    Ok(registration) => {
                        Some(self.execute(Command::CancelRegistration { registration }))
                    }
                    Err(e) => Some(toast(&e)),
                };
            }
        }

        if let Some(form) = self.form.as_mut() {
            return match form.handle_key(key) {
                FormEvent::Submit => self.submit(),
                FormEvent::Cancel => {
                    self.close();
                    None
                }
                FormEvent::Consumed => None,
            };
        }

        // Read-only modals.
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close(),
            _ => {}
        }
        None
    }

    #[allow(clippy::too_many_lines)]
    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Right => {
                if self.view.next_page() {
                    self.reset_selection();
                }
                None
            }
            KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Left => {
                if self.view.prev_page() {
                    self.reset_selection();
                }
                None
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('/') => {
                let field = self.view.search().map(|q| q.field).unwrap_or_default();
                let text = self.view.search().map(|q| q.text.clone()).unwrap_or_default();
                self.search = Some(SearchBox {
                    field,
                    input: Input::new(text),
                });
                None
            }
            KeyCode::Char('a') => self.open(UiMode::Add),
            KeyCode::Char('u') => self.open(UiMode::ExistingUser),
            KeyCode::Char('c') => self.open(UiMode::CheckActive),
            KeyCode::Char('U') => Some(Self::confirm(
                "Cập nhật trạng thái các đăng ký đã hết hạn?".to_owned(),
                Command::UpdateExpired,
            )),
            KeyCode::Enter => {
                let id = self.selected_id()?;
                self.open(UiMode::ViewDetail(id))
            }
            KeyCode::Char('e') => {
                let id = self.selected_id()?;
                self.open(UiMode::Edit(id))
            }
            KeyCode::Char('x') => {
                let id = self.selected_id()?;
                self.open(UiMode::Extend(id))
            }
            KeyCode::Char('s') => {
                let id = self.selected_id()?;
                self.open(UiMode::SmartExtend(id))
            }
            KeyCode::Char('m') => {
                let id = self.selected_id()?;
                self.open(UiMode::UpdateMonths(id))
            }
            KeyCode::Char('l') => {
                let id = self.selected_id()?;
                self.open(UiMode::ExtensionChain(id))
            }
            KeyCode::Char('v') => {
                let plate = self.selected()?.plate.clone();
                self.open(UiMode::ViewActive(plate))
            }
            KeyCode::Char('h') => {
                let plate = self.selected()?.plate.clone();
                self.open(UiMode::VehicleHistory(plate))
            }
            KeyCode::Char('p') => {
                let row = self.selected()?.clone();
                if row.status.is_terminal() {
                    return Some(Action::Notify(Notification::error(
                        parkdesk_core::messages::CANCELLED_TERMINAL,
                    )));
                }
                if !self.view.can_pay(&row) {
                    return Some(Action::Notify(Notification::error(
                        parkdesk_core::messages::NOT_EDITABLE,
                    )));
                }
                let prompt = format!("Xác nhận thanh toán đăng ký xe {}?", row.plate);
                let request = PaymentRequest {
                    amount: row.amount,
                    method: None,
                };
                Some(Self::confirm(
                    prompt,
                    Command::PayRegistration {
                        registration: Box::new(row),
                        request,
                    },
                ))
            }
            KeyCode::Char('d') => {
                let id = self.selected_id()?;
                Some(self.execute(Command::DeleteRegistration { id }))
            }
            _ => None,
        }
    }

    // ── Results ──────────────────────────────────────────────────────

    fn apply_lookup<T>(&mut self, result: &Result<T, CoreError>, wrap: impl FnOnce(T) -> Lookup)
    where
        T: Clone,
    {
        self.lookup = match result {
            Ok(value) => wrap(value.clone()),
            Err(e) => Lookup::Failed(e.user_message()),
        };
    }
}

fn toast(err: &CoreError) -> Action {
    Action::Notify(Notification::error(err.user_message()))
}

impl Component for RegistrationsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search.is_some() {
            return Ok(self.handle_search_key(key));
        }
        if self.view.mode().is_modal() {
            return Ok(self.handle_modal_key(key));
        }
        Ok(self.handle_browse_key(key))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.view.is_busy() => self.throbber.calc_next(),
            Action::LoggedIn(_) => return Ok(self.refresh()),

            Action::RegistrationsLoaded { result, created } => {
                let applied = match created {
                    Some(id) => self.view.finish_create(result.clone(), id),
                    None => self.view.finish_fetch(result.clone()),
                };
                if let Err(e) = applied {
                    return Ok(Some(toast(&e)));
                }
                match created {
                    Some(id) => self.select_row(id),
                    None => self.move_selection(0),
                }
            }
            Action::SearchLoaded(result) => {
                if let Err(e) = self.view.finish_search(result.clone()) {
                    return Ok(Some(toast(&e)));
                }
                self.reset_selection();
                if self.view.rows().is_empty() {
                    return Ok(Some(Action::Notify(Notification::info(
                        "Không tìm thấy đăng ký phù hợp",
                    ))));
                }
            }

            Action::ActiveChecked(result) if self.view.mode() == &UiMode::CheckActive => {
                self.apply_lookup(result, Lookup::Active);
            }
            Action::ActiveLoaded(result)
                if matches!(self.view.mode(), UiMode::ViewActive(_)) =>
            {
                self.apply_lookup(result, Lookup::ActiveRow);
            }
            Action::ChainLoaded(result)
                if matches!(self.view.mode(), UiMode::ExtensionChain(_)) =>
            {
                // Keep the locally known chain when the request fails.
                if result.is_ok() || !matches!(self.lookup, Lookup::Rows(_)) {
                    self.apply_lookup(result, Lookup::Rows);
                }
                return Ok(Action::failure(result));
            }
            Action::HistoryLoaded(result)
                if matches!(self.view.mode(), UiMode::VehicleHistory(_)) =>
            {
                self.apply_lookup(result, Lookup::Rows);
            }

            Action::CommandSucceeded {
                origin: ScreenId::Registrations,
                result,
            } => {
                self.in_flight = false;
                self.close();
                self.view.begin_fetch();
                return Ok(Some(Action::FetchRegistrations {
                    created: result.created_registration().cloned(),
                }));
            }
            Action::CommandFailed {
                origin: ScreenId::Registrations,
            } => self.in_flight = false,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        render::render(self, frame, area);
    }

    fn captures_input(&self) -> bool {
        self.search.is_some() || self.view.mode().is_modal()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use parkdesk_core::{CommandResult, PaymentStatus, RegistrationStatus, messages};
    use pretty_assertions::assert_eq;

    fn reg(id: i64, parent: Option<i64>, status: RegistrationStatus) -> Registration {
        Registration {
            id: RecordId::Num(id),
            plate: format!("51A-{id:03}.00"),
            months: 3,
            starts_at: None,
            expires_at: None,
            amount: Some(450_000.0),
            status,
            payment_status: PaymentStatus::Pending,
            extension_seq: u32::from(parent.is_some()),
            parent_id: parent.map(RecordId::Num),
            note: None,
            user_id: None,
            holder_name: None,
            cccd: None,
            employee_code: None,
        }
    }

    fn press(screen: &mut RegistrationsScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn type_text(screen: &mut RegistrationsScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    fn loaded(rows: Vec<Registration>) -> RegistrationsScreen {
        let mut screen = RegistrationsScreen::new();
        screen.update(&Action::LoggedIn(None)).unwrap();
        screen
            .update(&Action::RegistrationsLoaded {
                result: Ok(rows),
                created: None,
            })
            .unwrap();
        screen
    }

    #[test]
    fn login_triggers_a_fetch_once() {
        let mut screen = RegistrationsScreen::new();
        let first = screen.update(&Action::LoggedIn(None)).unwrap();
        assert!(matches!(first, Some(Action::FetchRegistrations { created: None })));
        assert!(screen.view.is_busy());
        assert!(screen.refresh().is_none());
    }

    #[test]
    fn paging_moves_through_the_list() {
        let rows = (1..=7)
            .map(|i| reg(i, None, RegistrationStatus::Active))
            .collect();
        let mut screen = loaded(rows);
        assert_eq!(screen.view.page_rows().len(), REGISTRATION_PAGE_SIZE);
        press(&mut screen, KeyCode::Char(']'));
        assert_eq!(screen.view.page_rows().len(), 2);
        assert_eq!(screen.selected_id(), Some(RecordId::Num(6)));
        press(&mut screen, KeyCode::Char('['));
        assert_eq!(screen.selected_id(), Some(RecordId::Num(1)));
    }

    #[test]
    fn update_months_larger_than_current_is_rejected_locally() {
        let mut screen = loaded(vec![reg(1, None, RegistrationStatus::Pending)]);
        press(&mut screen, KeyCode::Char('m'));
        assert!(screen.captures_input());
        press(&mut screen, KeyCode::Backspace);
        type_text(&mut screen, "5");
        let action = press(&mut screen, KeyCode::Enter);
        assert!(action.is_none());
        assert_eq!(
            screen.form.as_ref().and_then(Form::error),
            Some(messages::MONTHS_NOT_GREATER)
        );
        assert!(screen.view.mode().is_modal());
    }

    #[test]
    fn update_months_within_range_executes() {
        let mut screen = loaded(vec![reg(1, None, RegistrationStatus::Pending)]);
        press(&mut screen, KeyCode::Char('m'));
        press(&mut screen, KeyCode::Backspace);
        type_text(&mut screen, "2");
        let action = press(&mut screen, KeyCode::Enter);
        assert!(matches!(
            action,
            Some(Action::Execute { command, .. })
                if matches!(*command, Command::UpdateMonths { months: 2, .. })
        ));
        assert!(press(&mut screen, KeyCode::Enter).is_none());
    }

    #[test]
    fn extend_on_non_latest_row_is_refused() {
        let mut screen = loaded(vec![
            reg(1, None, RegistrationStatus::Active),
            reg(2, Some(1), RegistrationStatus::Active),
        ]);
        let action = press(&mut screen, KeyCode::Char('x'));
        assert!(matches!(
            action,
            Some(Action::Notify(ref n)) if n.message == messages::NOT_EXTENDABLE
        ));
        assert!(!screen.captures_input());
    }

    #[test]
    fn pay_on_cancelled_row_is_refused() {
        let mut screen = loaded(vec![reg(3, None, RegistrationStatus::Cancelled)]);
        let action = press(&mut screen, KeyCode::Char('p'));
        assert!(matches!(
            action,
            Some(Action::Notify(ref n)) if n.message == messages::CANCELLED_TERMINAL
        ));
    }

    #[test]
    fn pay_on_pending_row_asks_for_confirmation() {
        let mut screen = loaded(vec![reg(3, None, RegistrationStatus::Pending)]);
        let action = press(&mut screen, KeyCode::Char('p'));
        assert!(matches!(action, Some(Action::ShowConfirm(_))));
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut screen = loaded(vec![reg(4, None, RegistrationStatus::Active)]);
        let action = press(&mut screen, KeyCode::Char('d'));
        assert!(matches!(
            action,
            Some(Action::ShowConfirm(ref c)) if c.origin == ScreenId::Registrations
        ));
    }

    #[test]
    fn empty_search_restores_without_a_request() {
        let mut screen = loaded(vec![
            reg(1, None, RegistrationStatus::Active),
            reg(2, None, RegistrationStatus::Expired),
        ]);
        press(&mut screen, KeyCode::Char('/'));
        type_text(&mut screen, "51A-002");
        let action = press(&mut screen, KeyCode::Enter);
        assert!(matches!(action, Some(Action::SearchRegistrations(_))));
        screen
            .update(&Action::SearchLoaded(Ok(vec![reg(
                2,
                None,
                RegistrationStatus::Expired,
            )])))
            .unwrap();
        assert_eq!(screen.view.rows().len(), 1);

        press(&mut screen, KeyCode::Char('/'));
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL))
            .unwrap();
        let action = press(&mut screen, KeyCode::Enter);
        assert!(action.is_none());
        assert_eq!(screen.view.rows().len(), 2);
    }

    #[test]
    fn success_closes_the_modal_and_refetches_to_the_new_row() {
        let mut screen = loaded(vec![reg(1, None, RegistrationStatus::Active)]);
        press(&mut screen, KeyCode::Char('a'));
        let created = reg(9, None, RegistrationStatus::Pending);
        let follow = screen
            .update(&Action::CommandSucceeded {
                origin: ScreenId::Registrations,
                result: CommandResult::Registration(Box::new(created.clone())),
            })
            .unwrap();
        assert!(!screen.captures_input());
        assert!(matches!(
            follow,
            Some(Action::FetchRegistrations { created: Some(RecordId::Num(9)) })
        ));
        screen
            .update(&Action::RegistrationsLoaded {
                result: Ok(vec![reg(1, None, RegistrationStatus::Active), created]),
                created: Some(RecordId::Num(9)),
            })
            .unwrap();
        assert_eq!(screen.selected_id(), Some(RecordId::Num(9)));
    }

    #[test]
    fn failure_keeps_the_modal_open() {
        let mut screen = loaded(vec![]);
        press(&mut screen, KeyCode::Char('a'));
        screen
            .update(&Action::CommandFailed {
                origin: ScreenId::Registrations,
            })
            .unwrap();
        assert!(screen.view.mode().is_modal());
        assert!(!screen.in_flight);
    }

    #[test]
    fn chain_lookup_keeps_local_rows_on_error() {
        let mut screen = loaded(vec![
            reg(1, None, RegistrationStatus::Expired),
            reg(2, Some(1), RegistrationStatus::Active),
        ]);
        press(&mut screen, KeyCode::Char('l'));
        let toast = screen
            .update(&Action::ChainLoaded(Err(CoreError::Timeout)))
            .unwrap();
        assert!(toast.is_some());
        assert!(matches!(screen.lookup, Lookup::Rows(ref rows) if rows.len() == 2));
    }
}
