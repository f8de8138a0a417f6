// ── Gate transactions ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::RecordId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingTransaction {
    pub id: RecordId,
    pub plate: String,
    pub entered_at: Option<DateTime<Utc>>,
    pub exited_at: Option<DateTime<Utc>>,
    pub fee: Option<f64>,
    pub status: Option<String>,
    /// Covered by a monthly pass, so no fee is charged.
    pub monthly_pass: bool,
}

impl ParkingTransaction {
    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub fee: Option<f64>,
    pub hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingStatistics {
    pub entries: u64,
    pub exits: u64,
    pub currently_parked: u64,
    pub revenue: Option<f64>,
}
