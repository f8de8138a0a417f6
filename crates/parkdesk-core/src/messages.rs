// ── Operator-facing text ──
//
// Validation strings, fallbacks, and the lookup table that turns known
// backend rejections into friendlier Vietnamese.

use std::borrow::Cow;

pub const CONNECTION_FAILED: &str = "Không thể kết nối tới máy chủ";
pub const TIMEOUT: &str = "Máy chủ không phản hồi, vui lòng thử lại";
pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";
pub const GENERIC_FAILURE: &str = "Đã xảy ra lỗi, vui lòng thử lại";

pub const PLATE_REQUIRED: &str = "Vui lòng nhập biển số xe";
pub const MONTHS_RANGE: &str = "Số tháng phải từ 1 đến 12";
pub const MONTHS_NOT_GREATER: &str = "Số tháng mới không được lớn hơn số tháng hiện tại";
pub const NOT_EDITABLE: &str = "Chỉ có thể chỉnh sửa đăng ký chưa thanh toán";
pub const NOT_EXTENDABLE: &str =
    "Chỉ có thể gia hạn đăng ký mới nhất trong chuỗi đang hoạt động hoặc đã hết hạn";
pub const CANCELLED_TERMINAL: &str = "Đăng ký đã hủy, không thể thao tác thêm";
pub const CUSTOMER_REQUIRED: &str = "Vui lòng chọn khách hàng hoặc nhập CCCD";
pub const NAME_REQUIRED: &str = "Vui lòng nhập họ tên";
pub const CCCD_INVALID: &str = "CCCD phải gồm 9 hoặc 12 chữ số";
pub const VEHICLE_REQUIRED: &str = "Vui lòng nhập ít nhất một xe";
pub const AMOUNT_INVALID: &str = "Số tiền không hợp lệ";
pub const USERNAME_REQUIRED: &str = "Vui lòng nhập tên đăng nhập";
pub const PASSWORD_REQUIRED: &str = "Vui lòng nhập mật khẩu";
pub const FIELD_REQUIRED: &str = "Vui lòng nhập đầy đủ thông tin";

/// Known backend messages (lowercased fragments) and their friendly form.
const FRIENDLY: &[(&str, &str)] = &[
    ("already paid", "Đăng ký này đã được thanh toán"),
    ("đã thanh toán", "Đăng ký này đã được thanh toán, không thể chỉnh sửa"),
    ("cannot edit", NOT_EDITABLE),
    ("not the latest", NOT_EXTENDABLE),
    ("already extended", NOT_EXTENDABLE),
    ("already has an active", "Xe này đã có đăng ký tháng đang hoạt động"),
    ("active registration exists", "Xe này đã có đăng ký tháng đang hoạt động"),
    ("cancelled", CANCELLED_TERMINAL),
    ("vehicle not found", "Không tìm thấy xe với biển số này"),
    ("user not found", "Không tìm thấy khách hàng"),
    ("registration not found", "Không tìm thấy đăng ký tháng"),
    ("duplicate", "Dữ liệu đã tồn tại"),
    ("unique constraint", "Dữ liệu đã tồn tại"),
    ("forbidden", "Bạn không có quyền thực hiện thao tác này"),
];

/// Translate a backend message when a known fragment matches; otherwise
/// pass it through verbatim.
pub fn friendly_message(raw: &str) -> Cow<'_, str> {
    let lowered = raw.to_lowercase();
    FRIENDLY
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map_or(Cow::Borrowed(raw), |(_, friendly)| Cow::Borrowed(*friendly))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fragments_are_translated() {
        assert_eq!(
            friendly_message("Registration is ALREADY PAID"),
            "Đăng ký này đã được thanh toán"
        );
        assert_eq!(friendly_message("Only the latest registration in chain can be extended, this is not the latest"), NOT_EXTENDABLE);
    }

    #[test]
    fn unknown_messages_pass_through() {
        assert_eq!(friendly_message("Biển số không hợp lệ"), "Biển số không hợp lệ");
    }
}
