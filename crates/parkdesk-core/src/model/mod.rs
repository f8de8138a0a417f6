// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Built from the api crate's
// wire types in `convert.rs`.

pub mod dashboard;
pub mod id;
pub mod parking;
pub mod people;
pub mod registration;
pub mod vehicle;

pub use dashboard::{ActiveCheck, FaceMatch, UserDashboard};
pub use id::RecordId;
pub use parking::{FeeQuote, ParkingStatistics, ParkingTransaction};
pub use people::{Account, Role, Staff, User};
pub use registration::{PaymentStatus, Registration, RegistrationStatus};
pub use vehicle::{Vehicle, VehicleType};
