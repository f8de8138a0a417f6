//! Business logic between `parkdesk-api` and the front-ends (CLI / TUI).
//!
//! - **[`Controller`]**: Facade over the api client and session. Reads
//!   return domain types; mutations go through [`Controller::execute`] as a
//!   typed [`Command`], validated locally before one backend call.
//!
//! - **[`RegistrationView`]**: State for the monthly-registration screen:
//!   load phase, fetched and displayed lists, pager, and a single
//!   [`UiMode`] for whichever modal is open.
//!
//! - **[`ChainIndex`]**: `parent -> children` index over a fetched list.
//!   Backs the "latest in chain" and extension predicates.
//!
//! - **Domain model** ([`model`]): `Registration` with its status enums,
//!   plus flat user, vehicle and parking records keyed by [`RecordId`].

pub mod chain;
pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod messages;
pub mod model;
pub mod paging;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use chain::ChainIndex;
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use paging::{DIRECTORY_PAGE_SIZE, Pager, REGISTRATION_PAGE_SIZE};
pub use view::{Phase, RegistrationView, SearchField, SearchPlan, SearchQuery, UiMode};

pub use model::{
    Account, ActiveCheck, FaceMatch, FeeQuote, ParkingStatistics, ParkingTransaction,
    PaymentStatus, RecordId, Registration, RegistrationStatus, Role, Staff, User, UserDashboard,
    Vehicle, VehicleType,
};

// Session types callers need when wiring a token store.
pub use parkdesk_api::models::SessionUser;
pub use parkdesk_api::{MemoryTokenStore, TokenStore};
