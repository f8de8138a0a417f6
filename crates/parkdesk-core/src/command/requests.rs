// ── Typed request structs for Command payloads ──
//
// Each request validates itself before any network call (required fields,
// numeric ranges) and knows how to build its wire body.

use std::path::PathBuf;

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use parkdesk_api::models as wire;

use crate::error::CoreError;
use crate::messages;
use crate::model::{RecordId, Registration};

pub const MIN_MONTHS: u32 = 1;
pub const MAX_MONTHS: u32 = 12;

// ── Shared checks ──────────────────────────────────────────────────

/// Trim and upper-case a plate, rejecting empty input.
pub fn normalize_plate(raw: &str) -> Result<String, CoreError> {
    let plate = raw.trim().to_uppercase();
    if plate.is_empty() {
        return Err(CoreError::validation(messages::PLATE_REQUIRED));
    }
    Ok(plate)
}

pub fn validate_months(months: u32) -> Result<(), CoreError> {
    if (MIN_MONTHS..=MAX_MONTHS).contains(&months) {
        Ok(())
    } else {
        Err(CoreError::validation(messages::MONTHS_RANGE))
    }
}

fn validate_amount(amount: Option<f64>) -> Result<(), CoreError> {
    match amount {
        Some(a) if !a.is_finite() || a < 0.0 => Err(CoreError::validation(messages::AMOUNT_INVALID)),
        _ => Ok(()),
    }
}

fn validate_cccd(cccd: &str) -> Result<(), CoreError> {
    let digits = cccd.trim();
    if matches!(digits.len(), 9 | 12) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::validation(messages::CCCD_INVALID))
    }
}

fn required(value: Option<&String>, message: &str) -> Result<(), CoreError> {
    if value.is_some_and(|v| !v.trim().is_empty()) {
        Ok(())
    } else {
        Err(CoreError::validation(message))
    }
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

/// Month-count changes are only allowed before payment, within 1..=12,
/// and never upward.
pub fn check_update_months(current: &Registration, months: u32) -> Result<(), CoreError> {
    if current.status.is_terminal() {
        return Err(CoreError::validation(messages::CANCELLED_TERMINAL));
    }
    if !current.can_edit() {
        return Err(CoreError::validation(messages::NOT_EDITABLE));
    }
    validate_months(months)?;
    if months > current.months {
        return Err(CoreError::validation(messages::MONTHS_NOT_GREATER));
    }
    Ok(())
}

// ── Registrations ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRegistrationRequest {
    pub plate: String,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CreateRegistrationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        normalize_plate(&self.plate)?;
        validate_months(self.months)?;
        validate_amount(self.amount)
    }

    pub(crate) fn to_wire(&self) -> Result<wire::NewRegistration, CoreError> {
        Ok(wire::NewRegistration {
            plate: normalize_plate(&self.plate)?,
            months: self.months,
            user_id: self.user_id.as_ref().map(Into::into),
            starts_at: format_date(self.starts_on),
            amount: self.amount,
            note: self.note.clone(),
        })
    }
}

/// Pass for a customer already on file, identified by id or CCCD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cccd: Option<String>,
    pub plate: String,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExistingUserRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        match (&self.user_id, &self.cccd) {
            (None, None) => return Err(CoreError::validation(messages::CUSTOMER_REQUIRED)),
            (None, Some(cccd)) => validate_cccd(cccd)?,
            _ => {}
        }
        normalize_plate(&self.plate)?;
        validate_months(self.months)
    }

    pub(crate) fn to_wire(&self) -> Result<wire::ExistingUserRegistration, CoreError> {
        Ok(wire::ExistingUserRegistration {
            user_id: self.user_id.as_ref().map(Into::into),
            cccd: self.cccd.as_ref().map(|c| c.trim().to_owned()),
            plate: normalize_plate(&self.plate)?,
            months: self.months,
            note: self.note.clone(),
        })
    }
}

/// New customer plus their vehicles; the pass covers every listed plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomerRequest {
    pub user: UserRequest,
    pub plates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<RecordId>,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewCustomerRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.user.validate_new()?;
        if self.plates.iter().all(|p| p.trim().is_empty()) {
            return Err(CoreError::validation(messages::VEHICLE_REQUIRED));
        }
        validate_months(self.months)
    }

    pub(crate) fn to_wire(&self) -> Result<wire::UserVehiclesRegistration, CoreError> {
        let vehicles = self
            .plates
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                Ok(wire::VehiclePayload {
                    plate: Some(normalize_plate(p)?),
                    vehicle_type_id: self.vehicle_type_id.as_ref().map(Into::into),
                    ..wire::VehiclePayload::default()
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Ok(wire::UserVehiclesRegistration {
            user: self.user.to_wire(),
            vehicles,
            months: self.months,
            note: self.note.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRegistrationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl UpdateRegistrationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.starts_on.is_none() && self.amount.is_none() && self.note.is_none() {
            return Err(CoreError::validation(messages::FIELD_REQUIRED));
        }
        validate_amount(self.amount)
    }

    pub(crate) fn to_wire(&self) -> wire::RegistrationUpdate {
        wire::RegistrationUpdate {
            status: None,
            starts_at: format_date(self.starts_on),
            amount: self.amount,
            note: self.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendRegistrationRequest {
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExtendRegistrationRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_months(self.months)
    }

    pub(crate) fn to_wire(&self) -> wire::ExtendRequest {
        wire::ExtendRequest {
            months: self.months,
            note: self.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_amount(self.amount)
    }

    pub(crate) fn to_wire(&self) -> wire::PaymentRequest {
        wire::PaymentRequest {
            amount: self.amount,
            method: self.method.clone(),
        }
    }
}

// ── Users ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cccd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
}

impl UserRequest {
    /// Creation needs a name and a well-formed CCCD.
    pub fn validate_new(&self) -> Result<(), CoreError> {
        required(self.full_name.as_ref(), messages::NAME_REQUIRED)?;
        required(self.cccd.as_ref(), messages::CCCD_INVALID)?;
        self.validate_update()
    }

    pub fn validate_update(&self) -> Result<(), CoreError> {
        if let Some(cccd) = &self.cccd {
            validate_cccd(cccd)?;
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self) -> wire::UserPayload {
        wire::UserPayload {
            full_name: self.full_name.clone(),
            cccd: self.cccd.as_ref().map(|c| c.trim().to_owned()),
            phone: self.phone.clone(),
            email: self.email.clone(),
            employee_code: self.employee_code.clone(),
        }
    }
}

// ── Vehicles ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VehicleRequest {
    pub fn validate_new(&self) -> Result<(), CoreError> {
        normalize_plate(self.plate.as_deref().unwrap_or_default()).map(|_| ())
    }

    pub(crate) fn to_wire(&self) -> Result<wire::VehiclePayload, CoreError> {
        Ok(wire::VehiclePayload {
            plate: self.plate.as_deref().map(normalize_plate).transpose()?,
            vehicle_type_id: self.vehicle_type_id.as_ref().map(Into::into),
            owner_id: self.owner_id.as_ref().map(Into::into),
            color: self.color.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleTypeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_visit_price: Option<f64>,
}

impl VehicleTypeRequest {
    pub fn validate_new(&self) -> Result<(), CoreError> {
        required(self.name.as_ref(), messages::FIELD_REQUIRED)?;
        self.validate_update()
    }

    pub fn validate_update(&self) -> Result<(), CoreError> {
        validate_amount(self.monthly_price)?;
        validate_amount(self.per_visit_price)
    }

    pub(crate) fn to_wire(&self) -> wire::VehicleTypePayload {
        wire::VehicleTypePayload {
            name: self.name.clone(),
            monthly_price: self.monthly_price,
            per_visit_price: self.per_visit_price,
        }
    }
}

// ── Back office ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl StaffRequest {
    pub fn validate_new(&self) -> Result<(), CoreError> {
        required(self.full_name.as_ref(), messages::NAME_REQUIRED)?;
        required(self.employee_code.as_ref(), messages::FIELD_REQUIRED)
    }

    pub(crate) fn to_wire(&self) -> wire::StaffPayload {
        wire::StaffPayload {
            full_name: self.full_name.clone(),
            employee_code: self.employee_code.clone(),
            position: self.position.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleRequest {
    pub fn validate_new(&self) -> Result<(), CoreError> {
        required(self.name.as_ref(), messages::FIELD_REQUIRED)
    }

    pub(crate) fn to_wire(&self) -> wire::RolePayload {
        wire::RolePayload {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountRequest {
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub role_id: Option<RecordId>,
    pub status: Option<String>,
}

impl AccountRequest {
    pub fn validate_new(&self) -> Result<(), CoreError> {
        required(self.username.as_ref(), messages::USERNAME_REQUIRED)?;
        if self
            .password
            .as_ref()
            .is_none_or(|p| p.expose_secret().is_empty())
        {
            return Err(CoreError::validation(messages::PASSWORD_REQUIRED));
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self) -> wire::AccountPayload {
        wire::AccountPayload {
            username: self.username.clone(),
            password: self.password.as_ref().map(|p| p.expose_secret().to_owned()),
            role_id: self.role_id.as_ref().map(Into::into),
            status: self.status.clone(),
        }
    }
}

// ── Gate ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectEntryRequest {
    pub plate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<RecordId>,
}

impl DirectEntryRequest {
    pub(crate) fn to_wire(&self) -> Result<wire::DirectEntryRequest, CoreError> {
        Ok(wire::DirectEntryRequest {
            plate: normalize_plate(&self.plate)?,
            vehicle_type_id: self.vehicle_type_id.as_ref().map(Into::into),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceEnrollRequest {
    pub user_id: RecordId,
    pub image: PathBuf,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{PaymentStatus, RegistrationStatus};

    fn pending(months: u32) -> Registration {
        Registration {
            id: RecordId::Num(1),
            plate: "51A-123.45".into(),
            months,
            starts_at: None,
            expires_at: None,
            amount: None,
            status: RegistrationStatus::Pending,
            payment_status: PaymentStatus::Pending,
            extension_seq: 0,
            parent_id: None,
            note: None,
            user_id: None,
            holder_name: None,
            cccd: None,
            employee_code: None,
        }
    }

    #[test]
    fn months_outside_range_are_rejected() {
        assert!(validate_months(0).is_err());
        assert!(validate_months(13).is_err());
        assert!(validate_months(1).is_ok());
        assert!(validate_months(12).is_ok());
    }

    #[test]
    fn update_months_never_goes_up() {
        let reg = pending(3);
        assert!(check_update_months(&reg, 2).is_ok());
        assert!(check_update_months(&reg, 3).is_ok());
        let err = check_update_months(&reg, 4).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ValidationFailed { ref message } if message == messages::MONTHS_NOT_GREATER
        ));
    }

    #[test]
    fn update_months_requires_pending_payment() {
        let mut reg = pending(6);
        reg.payment_status = PaymentStatus::Complete;
        assert!(check_update_months(&reg, 1).is_err());
    }

    #[test]
    fn plate_is_trimmed_and_uppercased() {
        assert_eq!(normalize_plate("  51a-123.45 ").ok().as_deref(), Some("51A-123.45"));
        assert!(normalize_plate("   ").is_err());
    }

    #[test]
    fn existing_user_needs_an_identity() {
        let mut req = ExistingUserRequest {
            user_id: None,
            cccd: None,
            plate: "51A".into(),
            months: 1,
            note: None,
        };
        assert!(req.validate().is_err());
        req.cccd = Some("12345".into());
        assert!(req.validate().is_err());
        req.cccd = Some("079123456789".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let req = PaymentRequest {
            amount: Some(-1.0),
            method: None,
        };
        assert!(req.validate().is_err());
    }
}
