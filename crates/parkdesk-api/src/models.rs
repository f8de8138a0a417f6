// Wire types for the parking backend
//
// Field names follow the backend's Vietnamese camelCase keys via explicit
// renames. Fields use `#[serde(default)]` liberally because list endpoints
// and detail endpoints don't always return the same subset, and anything
// not modelled lands in `extra`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ── Identifiers ──────────────────────────────────────────────────────

/// Backend identifier: numeric on most tables, text on a few.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Num(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ── Lenient numbers ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Num(f64),
    Text(String),
}

/// Money columns arrive as JSON numbers or as decimal strings.
fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<NumberOrText>::deserialize(de)? {
        Some(NumberOrText::Num(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Profile returned next to the access token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "hoTen")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `POST /login` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

// ── Monthly registrations ────────────────────────────────────────────

/// One monthly parking-pass registration row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDto {
    pub id: WireId,
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(default, rename = "soThang")]
    pub months: u32,
    #[serde(default, rename = "thoiGianBatDau")]
    pub starts_at: Option<String>,
    #[serde(default, rename = "thoiGianHetHan")]
    pub expires_at: Option<String>,
    #[serde(default, rename = "soTienThanhToan", deserialize_with = "lenient_f64")]
    pub amount: Option<f64>,
    #[serde(default, rename = "trangThai")]
    pub status: String,
    #[serde(default, rename = "trangThaiThanhToan")]
    pub payment_status: String,
    #[serde(default, rename = "lanGiaHan")]
    pub extension_seq: u32,
    #[serde(default, rename = "parentId")]
    pub parent_id: Option<WireId>,
    #[serde(default, rename = "ghiChu")]
    pub note: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<WireId>,
    #[serde(default, rename = "hoTen")]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub cccd: Option<String>,
    #[serde(default, rename = "maNhanVien")]
    pub employee_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /dang-ky-thang/check-active/:plate` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveCheckDto {
    #[serde(default, rename = "isActive", alias = "hasActive", alias = "active")]
    pub is_active: bool,
    #[serde(default, alias = "dangKyThang")]
    pub registration: Option<RegistrationDto>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body for `POST /dang-ky-thang`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewRegistration {
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(rename = "soThang")]
    pub months: u32,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<WireId>,
    #[serde(rename = "thoiGianBatDau", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(rename = "soTienThanhToan", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `POST /dang-ky-thang/existing-user`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExistingUserRegistration {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<WireId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cccd: Option<String>,
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(rename = "soThang")]
    pub months: u32,
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `POST /dang-ky-thang/user-vehicles`: new customer, their
/// vehicles and a pass for the first plate, in one call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserVehiclesRegistration {
    #[serde(flatten)]
    pub user: UserPayload,
    #[serde(rename = "vehicles")]
    pub vehicles: Vec<VehiclePayload>,
    #[serde(rename = "soThang")]
    pub months: u32,
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `PUT /dang-ky-thang/:id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrationUpdate {
    #[serde(rename = "trangThai", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "thoiGianBatDau", skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(rename = "soTienThanhToan", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `/:id/extend` and `/:id/extend-expired`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtendRequest {
    #[serde(rename = "soThang")]
    pub months: u32,
    #[serde(rename = "ghiChu", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body for `/:id/payment`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PaymentRequest {
    #[serde(rename = "soTienThanhToan", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "phuongThucThanhToan", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Body for `/:id/update-months`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMonthsRequest {
    #[serde(rename = "soThang")]
    pub months: u32,
}

/// `/update-expired` reports how many rows the batch touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpiredSweepDto {
    #[serde(default, alias = "count", alias = "soLuong")]
    pub updated: u64,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: WireId,
    #[serde(default, rename = "hoTen")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub cccd: Option<String>,
    #[serde(default, rename = "soDienThoai")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "maNhanVien")]
    pub employee_code: Option<String>,
    #[serde(default, rename = "trangThai")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Create/update body for `/users`. Absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPayload {
    #[serde(rename = "hoTen", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cccd: Option<String>,
    #[serde(rename = "soDienThoai", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "maNhanVien", skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
}

// ── Vehicles ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDto {
    pub id: WireId,
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(default, rename = "loaiXeId")]
    pub vehicle_type_id: Option<WireId>,
    #[serde(default, rename = "tenLoaiXe")]
    pub vehicle_type_name: Option<String>,
    #[serde(default, rename = "userId")]
    pub owner_id: Option<WireId>,
    #[serde(default, rename = "mauXe")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VehiclePayload {
    #[serde(rename = "bienSoXe", skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(rename = "loaiXeId", skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<WireId>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<WireId>,
    #[serde(rename = "mauXe", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleTypeDto {
    pub id: WireId,
    #[serde(rename = "tenLoaiXe")]
    pub name: String,
    #[serde(default, rename = "giaThang", deserialize_with = "lenient_f64")]
    pub monthly_price: Option<f64>,
    #[serde(default, rename = "giaLuot", deserialize_with = "lenient_f64")]
    pub per_visit_price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VehicleTypePayload {
    #[serde(rename = "tenLoaiXe", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "giaThang", skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<f64>,
    #[serde(rename = "giaLuot", skip_serializing_if = "Option::is_none")]
    pub per_visit_price: Option<f64>,
}

// ── Staff, roles, accounts ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDto {
    pub id: WireId,
    #[serde(default, rename = "hoTen")]
    pub full_name: Option<String>,
    #[serde(default, rename = "maNhanVien")]
    pub employee_code: Option<String>,
    #[serde(default, rename = "chucVu")]
    pub position: Option<String>,
    #[serde(default, rename = "soDienThoai")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StaffPayload {
    #[serde(rename = "hoTen", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(rename = "maNhanVien", skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(rename = "chucVu", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "soDienThoai", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDto {
    pub id: WireId,
    #[serde(rename = "tenVaiTro", alias = "name")]
    pub name: String,
    #[serde(default, rename = "moTa")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RolePayload {
    #[serde(rename = "tenVaiTro", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "moTa", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub id: WireId,
    pub username: String,
    #[serde(default, rename = "roleId")]
    pub role_id: Option<WireId>,
    #[serde(default, rename = "trangThai")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "roleId", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<WireId>,
    #[serde(rename = "trangThai", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ── Parking transactions ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingTransactionDto {
    pub id: WireId,
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(default, rename = "thoiGianVao")]
    pub entered_at: Option<String>,
    #[serde(default, rename = "thoiGianRa")]
    pub exited_at: Option<String>,
    #[serde(default, rename = "phi", alias = "soTien", deserialize_with = "lenient_f64")]
    pub fee: Option<f64>,
    #[serde(default, rename = "trangThai")]
    pub status: Option<String>,
    #[serde(default, rename = "laVeThang")]
    pub monthly_pass: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectEntryRequest {
    #[serde(rename = "bienSoXe")]
    pub plate: String,
    #[serde(rename = "loaiXeId", skip_serializing_if = "Option::is_none")]
    pub vehicle_type_id: Option<WireId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectExitRequest {
    #[serde(rename = "bienSoXe")]
    pub plate: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeQuoteDto {
    #[serde(default, rename = "phi", alias = "soTien", deserialize_with = "lenient_f64")]
    pub fee: Option<f64>,
    #[serde(default, rename = "soGio", alias = "thoiGianGui", deserialize_with = "lenient_f64")]
    pub hours: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParkingStatsDto {
    #[serde(default, rename = "tongLuotVao")]
    pub entries: u64,
    #[serde(default, rename = "tongLuotRa")]
    pub exits: u64,
    #[serde(default, rename = "dangGui")]
    pub currently_parked: u64,
    #[serde(default, rename = "tongDoanhThu", deserialize_with = "lenient_f64")]
    pub revenue: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Dashboard & face recognition ─────────────────────────────────────

/// `GET /user/dashboard` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardDto {
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub vehicles: Vec<VehicleDto>,
    #[serde(default, alias = "dangKyThang")]
    pub registrations: Vec<RegistrationDto>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Image upload body. `image` is base64 without a data-URL prefix.
#[derive(Debug, Clone, Serialize)]
pub struct FaceImage {
    pub image: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceMatchDto {
    #[serde(default, alias = "success")]
    pub matched: bool,
    #[serde(default, rename = "userId")]
    pub user_id: Option<WireId>,
    #[serde(default, rename = "hoTen")]
    pub full_name: Option<String>,
    #[serde(default, alias = "similarity", deserialize_with = "lenient_f64")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registration_row_decodes_with_string_amount() {
        let row: RegistrationDto = serde_json::from_value(serde_json::json!({
            "id": 12,
            "bienSoXe": "51A-123.45",
            "soThang": 3,
            "soTienThanhToan": "450000.00",
            "trangThai": "ACTIVE",
            "trangThaiThanhToan": "COMPLETE",
            "lanGiaHan": 1,
            "parentId": 9,
            "vehicle": {"mauXe": "do"}
        }))
        .unwrap();
        assert_eq!(row.id, WireId::Num(12));
        assert_eq!(row.amount, Some(450_000.0));
        assert_eq!(row.parent_id, Some(WireId::Num(9)));
        assert!(row.extra.contains_key("vehicle"));
    }

    #[test]
    fn payloads_skip_absent_fields() {
        let body = serde_json::to_value(RegistrationUpdate {
            status: Some("CANCELLED".into()),
            ..RegistrationUpdate::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"trangThai": "CANCELLED"}));
    }

    #[test]
    fn user_vehicles_body_flattens_user() {
        let body = serde_json::to_value(UserVehiclesRegistration {
            user: UserPayload {
                full_name: Some("Nguyễn Văn A".into()),
                cccd: Some("079123456789".into()),
                ..UserPayload::default()
            },
            vehicles: vec![VehiclePayload {
                plate: Some("59X1-999.99".into()),
                ..VehiclePayload::default()
            }],
            months: 1,
            note: None,
        })
        .unwrap();
        assert_eq!(body["hoTen"], "Nguyễn Văn A");
        assert_eq!(body["vehicles"][0]["bienSoXe"], "59X1-999.99");
        assert_eq!(body["soThang"], 1);
    }
}
