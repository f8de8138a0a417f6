// ── Registration list view ──
//
// Front-end independent state for the monthly-registration screen: load
// phase, the list as fetched, the list as displayed, the chain index over
// the displayed list, the pager, and exactly one UI mode. The TUI renders
// it; the CLI reuses the search planning and predicates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::chain::ChainIndex;
use crate::command::requests::check_update_months;
use crate::error::CoreError;
use crate::messages;
use crate::model::{RecordId, Registration};
use crate::paging::{Pager, REGISTRATION_PAGE_SIZE};

/// Load phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Searching,
}

/// Which modal is open. Exactly one at a time; `Browse` means none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Browse,
    Add,
    Edit(RecordId),
    Extend(RecordId),
    ViewDetail(RecordId),
    CheckActive,
    ViewActive(String),
    UpdateMonths(RecordId),
    ExistingUser,
    SmartExtend(RecordId),
    ExtensionChain(RecordId),
    VehicleHistory(String),
}

impl UiMode {
    pub fn is_modal(&self) -> bool {
        !matches!(self, Self::Browse)
    }

    /// Row the modal acts on, if it is row-scoped.
    pub fn row(&self) -> Option<&RecordId> {
        match self {
            Self::Edit(id)
            | Self::Extend(id)
            | Self::ViewDetail(id)
            | Self::UpdateMonths(id)
            | Self::SmartExtend(id)
            | Self::ExtensionChain(id) => Some(id),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Browse => "Đăng ký tháng",
            Self::Add => "Thêm đăng ký tháng",
            Self::Edit(_) => "Chỉnh sửa đăng ký",
            Self::Extend(_) => "Gia hạn",
            Self::ViewDetail(_) => "Chi tiết đăng ký",
            Self::CheckActive => "Kiểm tra vé tháng",
            Self::ViewActive(_) => "Vé tháng đang hoạt động",
            Self::UpdateMonths(_) => "Cập nhật số tháng",
            Self::ExistingUser => "Đăng ký cho khách hàng cũ",
            Self::SmartExtend(_) => "Gia hạn thông minh",
            Self::ExtensionChain(_) => "Chuỗi gia hạn",
            Self::VehicleHistory(_) => "Lịch sử đăng ký xe",
        }
    }
}

/// Search key, mapped one-to-one onto a lookup endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum SearchField {
    #[default]
    #[strum(to_string = "Biển số")]
    Plate,
    #[strum(to_string = "CCCD")]
    Cccd,
    #[strum(to_string = "Mã nhân viên")]
    EmployeeCode,
    #[strum(to_string = "Trạng thái")]
    Status,
}

impl SearchField {
    /// Cycle order for the search box.
    pub fn next(self) -> Self {
        match self {
            Self::Plate => Self::Cccd,
            Self::Cccd => Self::EmployeeCode,
            Self::EmployeeCode => Self::Status,
            Self::Status => Self::Plate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub field: SearchField,
    pub text: String,
}

impl SearchQuery {
    pub fn new(field: SearchField, text: impl Into<String>) -> Self {
        Self {
            field,
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// What the caller must do after `begin_search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// The full list was restored locally; no request needed.
    Restore,
    /// Issue this lookup, then call `finish_search`.
    Fetch(SearchQuery),
}

#[derive(Debug, Clone)]
pub struct RegistrationView {
    phase: Phase,
    mode: UiMode,
    all: Vec<Registration>,
    rows: Vec<Registration>,
    index: ChainIndex,
    pager: Pager,
    search: Option<SearchQuery>,
}

impl Default for RegistrationView {
    fn default() -> Self {
        Self::new(REGISTRATION_PAGE_SIZE)
    }
}

impl RegistrationView {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: Phase::Idle,
            mode: UiMode::Browse,
            all: Vec::new(),
            rows: Vec::new(),
            index: ChainIndex::default(),
            pager: Pager::new(page_size),
            search: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    /// The displayed list (filtered while a search is active).
    pub fn rows(&self) -> &[Registration] {
        &self.rows
    }

    pub fn page_rows(&self) -> &[Registration] {
        self.pager.slice(&self.rows)
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.rows.len())
    }

    pub fn search(&self) -> Option<&SearchQuery> {
        self.search.as_ref()
    }

    pub fn index(&self) -> &ChainIndex {
        &self.index
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Searching)
    }

    pub fn find(&self, id: &RecordId) -> Option<&Registration> {
        self.rows.iter().find(|r| &r.id == id)
    }

    // ── Paging ───────────────────────────────────────────────────────

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.rows.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// A full fetch drops any active search.
    pub fn begin_fetch(&mut self) {
        self.phase = Phase::Loading;
        self.search = None;
    }

    /// Apply a full-list fetch. Failure keeps the previous list and hands
    /// the error back for a toast.
    pub fn finish_fetch(
        &mut self,
        result: Result<Vec<Registration>, CoreError>,
    ) -> Result<(), CoreError> {
        match result {
            Ok(list) => {
                self.all.clone_from(&list);
                self.replace_rows(list);
                self.phase = Phase::Loaded;
                Ok(())
            }
            Err(e) => {
                self.phase = self.settled_phase();
                Err(e)
            }
        }
    }

    /// Re-fetch after a create: the new row is shown by moving to its page.
    pub fn finish_create(
        &mut self,
        result: Result<Vec<Registration>, CoreError>,
        created: &RecordId,
    ) -> Result<(), CoreError> {
        self.finish_fetch(result)?;
        match self.rows.iter().position(|r| &r.id == created) {
            Some(pos) => self.pager.show_index(pos),
            None => self.pager.last(self.rows.len()),
        }
        Ok(())
    }

    // ── Search ───────────────────────────────────────────────────────

    /// An empty query restores the last full list without a request.
    pub fn begin_search(&mut self, query: SearchQuery) -> SearchPlan {
        if query.is_empty() {
            self.search = None;
            let all = self.all.clone();
            self.replace_rows(all);
            self.pager.first();
            self.phase = self.settled_phase();
            return SearchPlan::Restore;
        }
        self.phase = Phase::Searching;
        self.search = Some(query.clone());
        SearchPlan::Fetch(query)
    }

    pub fn finish_search(
        &mut self,
        result: Result<Vec<Registration>, CoreError>,
    ) -> Result<(), CoreError> {
        self.phase = Phase::Loaded;
        let list = result?;
        self.replace_rows(list);
        self.pager.first();
        Ok(())
    }

    // ── Modes ────────────────────────────────────────────────────────

    /// Open a modal, replacing any open one. Row-scoped modals check the
    /// row exists and that its lifecycle allows the action.
    pub fn open(&mut self, mode: UiMode) -> Result<(), CoreError> {
        self.permits(&mode)?;
        self.mode = mode;
        Ok(())
    }

    pub fn close(&mut self) {
        self.mode = UiMode::Browse;
    }

    fn permits(&self, mode: &UiMode) -> Result<(), CoreError> {
        let Some(id) = mode.row() else {
            return Ok(());
        };
        let row = self
            .find(id)
            .ok_or_else(|| CoreError::not_found("đăng ký", id))?;
        match mode {
            UiMode::Edit(_) | UiMode::UpdateMonths(_) if row.status.is_terminal() => {
                Err(CoreError::validation(messages::CANCELLED_TERMINAL))
            }
            UiMode::Edit(_) | UiMode::UpdateMonths(_) if !row.can_edit() => {
                Err(CoreError::validation(messages::NOT_EDITABLE))
            }
            UiMode::Extend(_) | UiMode::SmartExtend(_) if !self.index.can_extend(row) => {
                Err(CoreError::validation(messages::NOT_EXTENDABLE))
            }
            _ => Ok(()),
        }
    }

    // ── Predicates ───────────────────────────────────────────────────

    pub fn is_latest_in_chain(&self, row: &Registration) -> bool {
        self.index.is_latest_in_chain(&row.id)
    }

    pub fn can_edit(&self, row: &Registration) -> bool {
        row.can_edit()
    }

    pub fn can_pay(&self, row: &Registration) -> bool {
        row.can_pay()
    }

    pub fn can_extend(&self, row: &Registration) -> bool {
        self.index.can_extend(row)
    }

    pub fn can_smart_extend(&self, row: &Registration) -> bool {
        self.index.can_smart_extend(row)
    }

    /// Local check run before an update-months request is sent.
    pub fn validate_update_months(&self, id: &RecordId, months: u32) -> Result<(), CoreError> {
        let row = self
            .find(id)
            .ok_or_else(|| CoreError::not_found("đăng ký", id))?;
        check_update_months(row, months)
    }

    /// Locally known chain for a row, root first.
    pub fn local_chain(&self, id: &RecordId) -> Vec<&Registration> {
        self.index
            .chain_for(id)
            .iter()
            .filter_map(|cid| self.find(cid))
            .collect()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn replace_rows(&mut self, rows: Vec<Registration>) {
        self.index = ChainIndex::build(&rows);
        self.rows = rows;
        self.pager.clamp(self.rows.len());
    }

    fn settled_phase(&self) -> Phase {
        if self.all.is_empty() && self.rows.is_empty() {
            Phase::Idle
        } else {
            Phase::Loaded
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{PaymentStatus, RegistrationStatus};
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
            payment_status: PaymentStatus::Complete,
            extension_seq: u32::from(parent.is_some()),
            parent_id: parent.map(RecordId::Num),
            note: None,
            user_id: None,
            holder_name: None,
            cccd: None,
            employee_code: None,
        }
    }

    fn loaded(rows: Vec<Registration>) -> RegistrationView {
        let mut view = RegistrationView::default();
        view.begin_fetch();
        view.finish_fetch(Ok(rows)).unwrap();
        view
    }

    #[test]
    fn fetch_moves_idle_to_loaded() {
        let mut view = RegistrationView::default();
        assert_eq!(view.phase(), Phase::Idle);
        view.begin_fetch();
        assert_eq!(view.phase(), Phase::Loading);
        view.finish_fetch(Ok(vec![reg(1, None, RegistrationStatus::Active)]))
            .unwrap();
        assert_eq!(view.phase(), Phase::Loaded);
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn failed_fetch_keeps_previous_list() {
        let mut view = loaded(vec![reg(1, None, RegistrationStatus::Active)]);
        view.begin_fetch();
        let err = view.finish_fetch(Err(CoreError::Timeout)).unwrap_err();
        assert!(matches!(err, CoreError::Timeout));
        assert_eq!(view.phase(), Phase::Loaded);
        assert_eq!(view.rows().len(), 1);
    }

    #[test]
    fn failed_first_fetch_returns_to_idle() {
        let mut view = RegistrationView::default();
        view.begin_fetch();
        assert!(view.finish_fetch(Err(CoreError::Timeout)).is_err());
        assert_eq!(view.phase(), Phase::Idle);
    }

    #[test]
    fn empty_search_restores_full_list() {
        let mut view = loaded(vec![
            reg(1, None, RegistrationStatus::Active),
            reg(2, None, RegistrationStatus::Expired),
        ]);

        let plan = view.begin_search(SearchQuery::new(SearchField::Plate, "51A-001"));
        assert!(matches!(plan, SearchPlan::Fetch(_)));
        assert_eq!(view.phase(), Phase::Searching);
        view.finish_search(Ok(vec![reg(1, None, RegistrationStatus::Active)]))
            .unwrap();
        assert_eq!(view.rows().len(), 1);

        let plan = view.begin_search(SearchQuery::new(SearchField::Plate, "   "));
        assert_eq!(plan, SearchPlan::Restore);
        assert_eq!(view.rows().len(), 2);
        assert!(view.search().is_none());
        assert_eq!(view.phase(), Phase::Loaded);
    }

    #[test]
    fn extend_offered_only_on_tail() {
        let mut view = loaded(vec![
            reg(1, None, RegistrationStatus::Active),
            reg(2, Some(1), RegistrationStatus::Expired),
        ]);
        let (first, second) = (view.rows()[0].clone(), view.rows()[1].clone());
        assert!(!view.is_latest_in_chain(&first));
        assert!(view.is_latest_in_chain(&second));
        assert!(!view.can_extend(&first));
        assert!(view.can_extend(&second));

        assert!(view.open(UiMode::Extend(first.id.clone())).is_err());
        assert_eq!(view.mode(), &UiMode::Browse);
        view.open(UiMode::SmartExtend(second.id.clone())).unwrap();
        assert_eq!(view.mode(), &UiMode::SmartExtend(second.id));
    }

    #[test]
    fn one_modal_at_a_time() {
        let mut view = loaded(vec![reg(1, None, RegistrationStatus::Active)]);
        view.open(UiMode::Add).unwrap();
        view.open(UiMode::CheckActive).unwrap();
        assert_eq!(view.mode(), &UiMode::CheckActive);
        view.close();
        assert!(!view.mode().is_modal());
    }

    #[test]
    fn edit_requires_pending_payment() {
        let mut paid = reg(1, None, RegistrationStatus::Active);
        paid.payment_status = PaymentStatus::Complete;
        let mut unpaid = reg(2, None, RegistrationStatus::Pending);
        unpaid.payment_status = PaymentStatus::Pending;
        let mut view = loaded(vec![paid.clone(), unpaid.clone()]);

        assert!(!view.can_edit(&paid));
        assert_eq!(view.can_pay(&paid), view.can_edit(&paid));
        assert!(view.can_edit(&unpaid));
        assert!(view.open(UiMode::Edit(paid.id)).is_err());
        view.open(UiMode::UpdateMonths(unpaid.id.clone())).unwrap();
        assert!(view.validate_update_months(&unpaid.id, 5).is_err());
        assert!(view.validate_update_months(&unpaid.id, 2).is_ok());
    }

    #[test]
    fn create_advances_to_new_row_page() {
        let rows: Vec<_> = (1..=5)
            .map(|i| reg(i, None, RegistrationStatus::Active))
            .collect();
        let mut view = loaded(rows.clone());
        assert_eq!(view.page_count(), 1);

        let mut refreshed = rows;
        refreshed.push(reg(6, None, RegistrationStatus::Pending));
        view.begin_fetch();
        view.finish_create(Ok(refreshed), &RecordId::Num(6)).unwrap();

        assert_eq!(view.pager().page(), 2);
        assert_eq!(view.page_rows().len(), 1);
        assert_eq!(view.page_rows()[0].id, RecordId::Num(6));
    }

    #[test]
    fn missing_row_cannot_open_modal() {
        let mut view = loaded(vec![]);
        let err = view.open(UiMode::ViewDetail(RecordId::Num(9))).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn local_chain_is_root_first() {
        let view = loaded(vec![
            reg(2, Some(1), RegistrationStatus::Active),
            reg(1, None, RegistrationStatus::Expired),
        ]);
        let ids: Vec<_> = view
            .local_chain(&RecordId::Num(2))
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec![RecordId::Num(1), RecordId::Num(2)]);
    }
}
