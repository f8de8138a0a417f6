//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;

use parkdesk_core::{
    ActiveCheck, Command, CommandResult, CoreError, RecordId, Registration, SearchQuery,
    SessionUser, User, UserDashboard, Vehicle, VehicleType,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A command waiting on the confirm dialog.
#[derive(Debug, Clone)]
pub struct ConfirmAction {
    pub prompt: String,
    pub origin: ScreenId,
    pub command: Box<Command>,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prompt)
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Session ───────────────────────────────────────────────────
    LoggedIn(Option<SessionUser>),
    LoginFailed,
    Logout,

    // ── Fetch requests (screens → app) ────────────────────────────
    FetchDashboard,
    /// Full registration list; `created` moves the pager to that row.
    FetchRegistrations { created: Option<RecordId> },
    SearchRegistrations(SearchQuery),
    FetchUsers,
    FetchVehicles,
    CheckActive(String),
    FetchActive(String),
    FetchChain(RecordId),
    FetchHistory(String),

    // ── Fetch results (app → screens) ─────────────────────────────
    DashboardLoaded(Result<UserDashboard, CoreError>),
    RegistrationsLoaded {
        result: Result<Vec<Registration>, CoreError>,
        created: Option<RecordId>,
    },
    SearchLoaded(Result<Vec<Registration>, CoreError>),
    UsersLoaded(Result<Vec<User>, CoreError>),
    VehiclesLoaded(Result<(Vec<Vehicle>, Vec<VehicleType>), CoreError>),
    ActiveChecked(Result<ActiveCheck, CoreError>),
    ActiveLoaded(Result<Option<Registration>, CoreError>),
    ChainLoaded(Result<Vec<Registration>, CoreError>),
    HistoryLoaded(Result<Vec<Registration>, CoreError>),

    // ── Commands ──────────────────────────────────────────────────
    Execute {
        origin: ScreenId,
        command: Box<Command>,
    },
    CommandSucceeded {
        origin: ScreenId,
        result: CommandResult,
    },
    CommandFailed {
        origin: ScreenId,
    },

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

impl Action {
    /// Toast for a failed request, or `None` on success.
    pub fn failure<T>(result: &Result<T, CoreError>) -> Option<Action> {
        result
            .as_ref()
            .err()
            .map(|e| Action::Notify(Notification::error(e.user_message())))
    }
}
