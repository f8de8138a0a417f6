// ── Aggregate views returned by single endpoints ──

use serde::{Deserialize, Serialize};

use super::id::RecordId;
use super::people::User;
use super::registration::Registration;
use super::vehicle::Vehicle;

/// `GET /user/dashboard`: the caller's profile, vehicles and passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDashboard {
    pub user: Option<User>,
    pub vehicles: Vec<Vehicle>,
    pub registrations: Vec<Registration>,
}

/// Result of asking whether a plate currently holds a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCheck {
    pub plate: String,
    pub is_active: bool,
    pub registration: Option<Registration>,
    pub message: Option<String>,
}

/// Face-recognition verdict from the external matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub matched: bool,
    pub user_id: Option<RecordId>,
    pub full_name: Option<String>,
    pub confidence: Option<f64>,
}
