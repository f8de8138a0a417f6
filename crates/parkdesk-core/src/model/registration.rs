// ── Monthly registration ("đăng ký tháng") ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::id::RecordId;

/// Lifecycle status of a registration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum RegistrationStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
    /// A value this build doesn't know about.
    Unknown,
}

impl RegistrationStatus {
    /// Cancelled rows accept no further mutation.
    pub fn is_terminal(self) -> bool {
        self == Self::Cancelled
    }

    /// Statuses from which a chain may grow.
    pub fn is_extendable(self) -> bool {
        matches!(self, Self::Active | Self::Expired)
    }

    pub fn label_vi(self) -> &'static str {
        match self {
            Self::Pending => "Chờ thanh toán",
            Self::Active => "Đang hoạt động",
            Self::Expired => "Hết hạn",
            Self::Cancelled => "Đã hủy",
            Self::Unknown => "Không xác định",
        }
    }
}

/// Payment status of a registration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[non_exhaustive]
pub enum PaymentStatus {
    Pending,
    Complete,
    Unknown,
}

impl PaymentStatus {
    pub fn label_vi(self) -> &'static str {
        match self {
            Self::Pending => "Chưa thanh toán",
            Self::Complete => "Đã thanh toán",
            Self::Unknown => "Không xác định",
        }
    }
}

/// A monthly parking-pass registration.
///
/// Extensions are separate rows: each one points at its immediate
/// predecessor through `parent_id` and carries `extension_seq =
/// predecessor + 1`. The root of a chain has no parent and sequence `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RecordId,
    pub plate: String,
    pub months: u32,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
    pub status: RegistrationStatus,
    pub payment_status: PaymentStatus,
    pub extension_seq: u32,
    pub parent_id: Option<RecordId>,
    pub note: Option<String>,
    pub user_id: Option<RecordId>,
    pub holder_name: Option<String>,
    pub cccd: Option<String>,
    pub employee_code: Option<String>,
}

impl Registration {
    /// Month count and cancellation are only editable before payment.
    pub fn can_edit(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }

    pub fn can_pay(&self) -> bool {
        self.can_edit()
    }

    pub fn can_cancel(&self) -> bool {
        self.can_edit() && !self.status.is_terminal()
    }

    /// Whole days of coverage left, negative once lapsed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|end| (end - now).num_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "active".parse::<RegistrationStatus>().ok(),
            Some(RegistrationStatus::Active)
        );
        assert_eq!(RegistrationStatus::Cancelled.to_string(), "CANCELLED");
        assert!("archived".parse::<RegistrationStatus>().is_err());
    }

    #[test]
    fn only_active_and_expired_extend() {
        assert!(RegistrationStatus::Active.is_extendable());
        assert!(RegistrationStatus::Expired.is_extendable());
        assert!(!RegistrationStatus::Pending.is_extendable());
        assert!(!RegistrationStatus::Cancelled.is_extendable());
    }
}
