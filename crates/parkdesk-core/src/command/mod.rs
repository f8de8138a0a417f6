// ── Command API ──
//
// Every mutation the front-ends can perform. Commands are validated and
// routed by `Controller::execute`, one backend call each.

pub mod requests;

use crate::model::{
    Account, FaceMatch, ParkingTransaction, RecordId, Registration, Role, Staff, User, Vehicle,
    VehicleType,
};

use self::requests::{
    AccountRequest, CreateRegistrationRequest, DirectEntryRequest, ExistingUserRequest,
    ExtendRegistrationRequest, FaceEnrollRequest, NewCustomerRequest, PaymentRequest, RoleRequest,
    StaffRequest, UpdateRegistrationRequest, UserRequest, VehicleRequest, VehicleTypeRequest,
};

/// All mutations, grouped by resource.
///
/// Row-scoped registration commands carry the row as last seen so the
/// lifecycle rules can be checked before anything is sent.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Registrations ────────────────────────────────────────────────
    CreateRegistration(CreateRegistrationRequest),
    CreateForExistingUser(ExistingUserRequest),
    CreateWithUserVehicles(NewCustomerRequest),
    UpdateRegistration {
        id: RecordId,
        update: UpdateRegistrationRequest,
    },
    CancelRegistration {
        registration: Box<Registration>,
    },
    DeleteRegistration {
        id: RecordId,
    },
    ExtendRegistration {
        registration: Box<Registration>,
        request: ExtendRegistrationRequest,
    },
    /// Extend via `/extend` when active or `/extend-expired` when lapsed.
    SmartExtend {
        registration: Box<Registration>,
        request: ExtendRegistrationRequest,
    },
    PayRegistration {
        registration: Box<Registration>,
        request: PaymentRequest,
    },
    UpdateMonths {
        registration: Box<Registration>,
        months: u32,
    },
    UpdateExpired,

    // ── Users ────────────────────────────────────────────────────────
    CreateUser(UserRequest),
    UpdateUser {
        id: RecordId,
        update: UserRequest,
    },
    DeleteUser {
        id: RecordId,
    },

    // ── Vehicles ─────────────────────────────────────────────────────
    CreateVehicle(VehicleRequest),
    UpdateVehicle {
        id: RecordId,
        update: VehicleRequest,
    },
    DeleteVehicle {
        id: RecordId,
    },
    CreateVehicleType(VehicleTypeRequest),
    UpdateVehicleType {
        id: RecordId,
        update: VehicleTypeRequest,
    },
    DeleteVehicleType {
        id: RecordId,
    },

    // ── Back office ──────────────────────────────────────────────────
    CreateStaff(StaffRequest),
    UpdateStaff {
        id: RecordId,
        update: StaffRequest,
    },
    DeleteStaff {
        id: RecordId,
    },
    CreateRole(RoleRequest),
    UpdateRole {
        id: RecordId,
        update: RoleRequest,
    },
    DeleteRole {
        id: RecordId,
    },
    CreateAccount(AccountRequest),
    UpdateAccount {
        id: RecordId,
        update: AccountRequest,
    },
    DeleteAccount {
        id: RecordId,
    },

    // ── Gate ─────────────────────────────────────────────────────────
    DirectEntry(DirectEntryRequest),
    DirectExit {
        plate: String,
    },
    EnrollFace(FaceEnrollRequest),
}

impl Command {
    /// Commands that destroy or end something; front-ends confirm first.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::CancelRegistration { .. }
                | Self::DeleteRegistration { .. }
                | Self::DeleteUser { .. }
                | Self::DeleteVehicle { .. }
                | Self::DeleteVehicleType { .. }
                | Self::DeleteStaff { .. }
                | Self::DeleteRole { .. }
                | Self::DeleteAccount { .. }
        )
    }

    /// Toast text shown after the command succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::CreateRegistration(_)
            | Self::CreateForExistingUser(_)
            | Self::CreateWithUserVehicles(_) => "Đăng ký tháng thành công",
            Self::UpdateRegistration { .. } => "Cập nhật đăng ký thành công",
            Self::CancelRegistration { .. } => "Đã hủy đăng ký",
            Self::ExtendRegistration { .. } | Self::SmartExtend { .. } => "Gia hạn thành công",
            Self::PayRegistration { .. } => "Thanh toán thành công",
            Self::UpdateMonths { .. } => "Cập nhật số tháng thành công",
            Self::UpdateExpired => "Đã cập nhật trạng thái hết hạn",
            Self::CreateUser(_)
            | Self::CreateVehicle(_)
            | Self::CreateVehicleType(_)
            | Self::CreateStaff(_)
            | Self::CreateRole(_)
            | Self::CreateAccount(_) => "Thêm mới thành công",
            Self::UpdateUser { .. }
            | Self::UpdateVehicle { .. }
            | Self::UpdateVehicleType { .. }
            | Self::UpdateStaff { .. }
            | Self::UpdateRole { .. }
            | Self::UpdateAccount { .. } => "Cập nhật thành công",
            Self::DeleteRegistration { .. }
            | Self::DeleteUser { .. }
            | Self::DeleteVehicle { .. }
            | Self::DeleteVehicleType { .. }
            | Self::DeleteStaff { .. }
            | Self::DeleteRole { .. }
            | Self::DeleteAccount { .. } => "Xóa thành công",
            Self::DirectEntry(_) => "Đã ghi nhận xe vào",
            Self::DirectExit { .. } => "Đã ghi nhận xe ra",
            Self::EnrollFace(_) => "Đã đăng ký khuôn mặt",
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Registration(Box<Registration>),
    ExpiredSweep { updated: u64 },
    User(User),
    Vehicle(Vehicle),
    VehicleType(VehicleType),
    Staff(Staff),
    Role(Role),
    Account(Account),
    Transaction(ParkingTransaction),
    Face(FaceMatch),
}

impl CommandResult {
    /// Id of the row a create produced, used to scroll the view to it.
    pub fn created_registration(&self) -> Option<&RecordId> {
        match self {
            Self::Registration(r) => Some(&r.id),
            _ => None,
        }
    }
}
