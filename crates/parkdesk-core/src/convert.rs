// ── API-to-domain type conversions ──
//
// Bridges raw `parkdesk_api::models` wire types into the canonical domain
// types. Status strings become enums, timestamp strings become
// `DateTime<Utc>`, and ids become `RecordId`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use parkdesk_api::models::{
    AccountDto, ActiveCheckDto, DashboardDto, FaceMatchDto, FeeQuoteDto, ParkingStatsDto,
    ParkingTransactionDto, RegistrationDto, RoleDto, StaffDto, UserDto, VehicleDto,
    VehicleTypeDto,
};

use crate::model::{
    Account, ActiveCheck, FaceMatch, FeeQuote, ParkingStatistics, ParkingTransaction,
    PaymentStatus, Registration, RegistrationStatus, Role, Staff, User, UserDashboard, Vehicle,
    VehicleType,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse the timestamp shapes the backend emits: RFC 3339, naive
/// date-times with or without fractional seconds, and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_opt_timestamp(raw: Option<&String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| parse_timestamp(s))
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Registrations ──────────────────────────────────────────────────

impl From<RegistrationDto> for Registration {
    fn from(r: RegistrationDto) -> Self {
        Self {
            id: r.id.into(),
            plate: r.plate,
            months: r.months,
            starts_at: parse_opt_timestamp(r.starts_at.as_ref()),
            expires_at: parse_opt_timestamp(r.expires_at.as_ref()),
            amount: r.amount,
            status: r.status.parse().unwrap_or(RegistrationStatus::Unknown),
            payment_status: r.payment_status.parse().unwrap_or(PaymentStatus::Unknown),
            extension_seq: r.extension_seq,
            parent_id: r.parent_id.map(Into::into),
            note: non_empty(r.note),
            user_id: r.user_id.map(Into::into),
            holder_name: non_empty(r.holder_name),
            cccd: non_empty(r.cccd),
            employee_code: non_empty(r.employee_code),
        }
    }
}

/// Convert a whole list, in backend order.
pub fn registrations(rows: Vec<RegistrationDto>) -> Vec<Registration> {
    rows.into_iter().map(Registration::from).collect()
}

impl ActiveCheck {
    pub(crate) fn from_dto(plate: &str, dto: ActiveCheckDto) -> Self {
        let registration = dto.registration.map(Registration::from);
        Self {
            plate: plate.to_owned(),
            is_active: dto.is_active
                || registration
                    .as_ref()
                    .is_some_and(|r| r.status == RegistrationStatus::Active),
            registration,
            message: dto.message,
        }
    }
}

// ── People ─────────────────────────────────────────────────────────

impl From<UserDto> for User {
    fn from(u: UserDto) -> Self {
        Self {
            id: u.id.into(),
            full_name: non_empty(u.full_name),
            cccd: non_empty(u.cccd),
            phone: non_empty(u.phone),
            email: non_empty(u.email),
            employee_code: non_empty(u.employee_code),
            status: u.status,
        }
    }
}

impl From<StaffDto> for Staff {
    fn from(s: StaffDto) -> Self {
        Self {
            id: s.id.into(),
            full_name: non_empty(s.full_name),
            employee_code: non_empty(s.employee_code),
            position: non_empty(s.position),
            phone: non_empty(s.phone),
            email: non_empty(s.email),
        }
    }
}

impl From<RoleDto> for Role {
    fn from(r: RoleDto) -> Self {
        Self {
            id: r.id.into(),
            name: r.name,
            description: non_empty(r.description),
        }
    }
}

impl From<AccountDto> for Account {
    fn from(a: AccountDto) -> Self {
        Self {
            id: a.id.into(),
            username: a.username,
            role_id: a.role_id.map(Into::into),
            status: a.status,
        }
    }
}

// ── Vehicles ───────────────────────────────────────────────────────

impl From<VehicleDto> for Vehicle {
    fn from(v: VehicleDto) -> Self {
        Self {
            id: v.id.into(),
            plate: v.plate,
            vehicle_type_id: v.vehicle_type_id.map(Into::into),
            vehicle_type_name: non_empty(v.vehicle_type_name),
            owner_id: v.owner_id.map(Into::into),
            color: non_empty(v.color),
        }
    }
}

impl From<VehicleTypeDto> for VehicleType {
    fn from(t: VehicleTypeDto) -> Self {
        Self {
            id: t.id.into(),
            name: t.name,
            monthly_price: t.monthly_price,
            per_visit_price: t.per_visit_price,
        }
    }
}

// ── Parking ────────────────────────────────────────────────────────

impl From<ParkingTransactionDto> for ParkingTransaction {
    fn from(t: ParkingTransactionDto) -> Self {
        Self {
            id: t.id.into(),
            plate: t.plate,
            entered_at: parse_opt_timestamp(t.entered_at.as_ref()),
            exited_at: parse_opt_timestamp(t.exited_at.as_ref()),
            fee: t.fee,
            status: t.status,
            monthly_pass: t.monthly_pass.unwrap_or(false),
        }
    }
}

impl From<FeeQuoteDto> for FeeQuote {
    fn from(q: FeeQuoteDto) -> Self {
        Self {
            fee: q.fee,
            hours: q.hours,
        }
    }
}

impl From<ParkingStatsDto> for ParkingStatistics {
    fn from(s: ParkingStatsDto) -> Self {
        Self {
            entries: s.entries,
            exits: s.exits,
            currently_parked: s.currently_parked,
            revenue: s.revenue,
        }
    }
}

// ── Aggregates ─────────────────────────────────────────────────────

impl From<DashboardDto> for UserDashboard {
    fn from(d: DashboardDto) -> Self {
        Self {
            user: d.user.map(User::from),
            vehicles: d.vehicles.into_iter().map(Vehicle::from).collect(),
            registrations: registrations(d.registrations),
        }
    }
}

impl From<FaceMatchDto> for FaceMatch {
    fn from(f: FaceMatchDto) -> Self {
        Self {
            matched: f.matched,
            user_id: f.user_id.map(Into::into),
            full_name: non_empty(f.full_name),
            confidence: f.confidence,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn timestamps_in_all_backend_shapes() {
        let rfc = parse_timestamp("2026-03-01T07:30:00.000Z").unwrap();
        assert_eq!((rfc.month(), rfc.hour()), (3, 7));

        let offset = parse_timestamp("2026-03-01T14:30:00+07:00").unwrap();
        assert_eq!(offset.hour(), 7);

        let naive = parse_timestamp("2026-03-01 07:30:00").unwrap();
        assert_eq!(naive.minute(), 30);

        let date = parse_timestamp("2026-03-01").unwrap();
        assert_eq!((date.day(), date.hour()), (1, 0));

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("tomorrow").is_none());
    }

    #[test]
    fn unknown_status_does_not_fail_conversion() {
        let dto: RegistrationDto = serde_json::from_value(serde_json::json!({
            "id": "5",
            "bienSoXe": "29B-111.11",
            "trangThai": "SUSPENDED",
            "trangThaiThanhToan": "complete",
            "ghiChu": "  "
        }))
        .unwrap();
        let reg = Registration::from(dto);
        assert_eq!(reg.id, crate::model::RecordId::Num(5));
        assert_eq!(reg.status, RegistrationStatus::Unknown);
        assert_eq!(reg.payment_status, PaymentStatus::Complete);
        assert_eq!(reg.note, None);
    }
}
