// ── Controller facade ──
//
// Single entry point the CLI and TUI talk to. Owns the api client and the
// session, converts wire types into the domain model, validates commands
// before they leave the process, and routes each command to exactly one
// backend call. Cheap to clone; clones share the session.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use secrecy::SecretString;
use tracing::{debug, info};

use parkdesk_api::models::{FaceImage, RegistrationUpdate, SessionUser};
use parkdesk_api::{Client, Session};

use crate::chain::ChainIndex;
use crate::command::requests::{check_update_months, normalize_plate};
use crate::command::{Command, CommandResult};
use crate::config::ControllerConfig;
use crate::convert;
use crate::error::CoreError;
use crate::messages;
use crate::model::{
    Account, ActiveCheck, FaceMatch, FeeQuote, ParkingStatistics, ParkingTransaction, RecordId,
    Registration, RegistrationStatus, Role, Staff, User, UserDashboard, Vehicle, VehicleType,
};
use crate::view::{SearchField, SearchQuery};

#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: Client,
}

impl Controller {
    /// Build the client and session. Does not contact the backend.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let session = match &config.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(Arc::clone(&config.token_store)),
        };
        let client = Client::new(config.url.clone(), Arc::new(session), &config.transport())?;
        Ok(Self::from_client(config, client))
    }

    /// Wrap an already-built client (tests point this at a mock server).
    pub fn from_client(config: ControllerConfig, client: Client) -> Self {
        Self {
            inner: Arc::new(ControllerInner { config, client }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    fn client(&self) -> &Client {
        &self.inner.client
    }

    // ── Session ──────────────────────────────────────────────────

    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Option<SessionUser>, CoreError> {
        if username.trim().is_empty() {
            return Err(CoreError::validation(messages::USERNAME_REQUIRED));
        }
        let resp = self.client().login(username.trim(), password).await?;
        Ok(resp.user)
    }

    pub fn logout(&self) {
        info!("logging out");
        self.client().session().clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.client().session().is_authenticated()
    }

    pub fn session_user(&self) -> Option<SessionUser> {
        self.client().session().user()
    }

    // ── Registrations: reads ─────────────────────────────────────

    pub async fn registrations(&self) -> Result<Vec<Registration>, CoreError> {
        Ok(convert::registrations(
            self.client().list_registrations().await?,
        ))
    }

    pub async fn registration(&self, id: &RecordId) -> Result<Registration, CoreError> {
        let raw = self
            .client()
            .get_registration(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "đăng ký", id))?;
        Ok(raw.into())
    }

    /// Run the lookup a search query maps to.
    pub async fn search_registrations(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Registration>, CoreError> {
        let text = query.text.trim();
        debug!(field = ?query.field, text, "searching registrations");
        let client = self.client();
        let rows = match query.field {
            SearchField::Plate => {
                client
                    .registrations_by_plate(&normalize_plate(text)?)
                    .await
            }
            SearchField::Cccd => client.registrations_by_cccd(text).await,
            SearchField::EmployeeCode => client.registrations_by_employee(text).await,
            SearchField::Status => {
                let status: RegistrationStatus = text.parse().map_err(|_| {
                    CoreError::validation(format!("Trạng thái không hợp lệ: {text}"))
                })?;
                client.registrations_by_status(&status.to_string()).await
            }
        };
        match rows {
            Ok(rows) => Ok(convert::registrations(rows)),
            // Lookups answer 404 when nothing matches.
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn active_registration(&self, plate: &str) -> Result<Option<Registration>, CoreError> {
        let plate = normalize_plate(plate)?;
        Ok(self
            .client()
            .active_registration(&plate)
            .await?
            .map(Registration::from))
    }

    pub async fn check_active(&self, plate: &str) -> Result<ActiveCheck, CoreError> {
        let plate = normalize_plate(plate)?;
        let dto = self.client().check_active(&plate).await?;
        Ok(ActiveCheck::from_dto(&plate, dto))
    }

    /// All registrations a plate ever held, ordered by extension sequence.
    pub async fn vehicle_history(&self, plate: &str) -> Result<Vec<Registration>, CoreError> {
        let plate = normalize_plate(plate)?;
        let mut rows = convert::registrations(self.client().registration_history(&plate).await?);
        rows.sort_by(|a, b| {
            a.starts_at
                .cmp(&b.starts_at)
                .then(a.extension_seq.cmp(&b.extension_seq))
        });
        Ok(rows)
    }

    /// The chain `id` belongs to, root first.
    pub async fn extension_chain(&self, id: &RecordId) -> Result<Vec<Registration>, CoreError> {
        let mut rows = convert::registrations(
            self.client()
                .extension_chain(&id.to_string())
                .await
                .map_err(|e| not_found_as(e, "đăng ký", id))?,
        );
        rows.sort_by_key(|r| r.extension_seq);
        Ok(rows)
    }

    // ── Directory reads ──────────────────────────────────────────

    pub async fn users(&self) -> Result<Vec<User>, CoreError> {
        Ok(collect(self.client().list_users().await?))
    }

    pub async fn user(&self, id: &RecordId) -> Result<User, CoreError> {
        let raw = self
            .client()
            .get_user(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "khách hàng", id))?;
        Ok(raw.into())
    }

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, CoreError> {
        Ok(collect(self.client().list_vehicles().await?))
    }

    pub async fn vehicle(&self, id: &RecordId) -> Result<Vehicle, CoreError> {
        let raw = self
            .client()
            .get_vehicle(&id.to_string())
            .await
            .map_err(|e| not_found_as(e, "xe", id))?;
        Ok(raw.into())
    }

    pub async fn vehicle_types(&self) -> Result<Vec<VehicleType>, CoreError> {
        Ok(collect(self.client().list_vehicle_types().await?))
    }

    pub async fn staff(&self) -> Result<Vec<Staff>, CoreError> {
        Ok(collect(self.client().list_staff().await?))
    }

    pub async fn roles(&self) -> Result<Vec<Role>, CoreError> {
        Ok(collect(self.client().list_roles().await?))
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, CoreError> {
        Ok(collect(self.client().list_accounts().await?))
    }

    // ── Parking & dashboard ──────────────────────────────────────

    pub async fn parking_transactions(&self) -> Result<Vec<ParkingTransaction>, CoreError> {
        Ok(collect(self.client().list_parking_transactions().await?))
    }

    pub async fn fee_quote(&self, id: &RecordId) -> Result<FeeQuote, CoreError> {
        Ok(self.client().calculate_fee(&id.to_string()).await?.into())
    }

    pub async fn parking_statistics(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<ParkingStatistics, CoreError> {
        if matches!((from, to), (Some(from), Some(to)) if from > to) {
            return Err(CoreError::validation("Ngày bắt đầu phải trước ngày kết thúc"));
        }
        Ok(self.client().parking_statistics(from, to).await?.into())
    }

    pub async fn dashboard(&self) -> Result<UserDashboard, CoreError> {
        Ok(self.client().user_dashboard().await?.into())
    }

    pub async fn recognize_face(&self, image: &Path) -> Result<FaceMatch, CoreError> {
        let image = FaceImage::from_path(image).await?;
        Ok(self.client().recognize_face(&image).await?.into())
    }

    // ── Command execution ────────────────────────────────────────

    /// Validate and run one mutation.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        route_command(self.client(), cmd).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn collect<W, T: From<W>>(rows: Vec<W>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}

fn not_found_as(err: parkdesk_api::Error, entity: &str, id: &RecordId) -> CoreError {
    if err.is_not_found() {
        CoreError::not_found(entity, id)
    } else {
        err.into()
    }
}

fn registration(raw: parkdesk_api::models::RegistrationDto) -> CommandResult {
    CommandResult::Registration(Box::new(raw.into()))
}

fn require_extendable(reg: &Registration) -> Result<(), CoreError> {
    if reg.status.is_terminal() {
        return Err(CoreError::validation(messages::CANCELLED_TERMINAL));
    }
    if !reg.status.is_extendable() {
        return Err(CoreError::validation(messages::NOT_EXTENDABLE));
    }
    Ok(())
}

/// Only the tail of a chain may be extended; re-read the chain to check.
async fn require_chain_tail(client: &Client, reg: &Registration) -> Result<(), CoreError> {
    let id = reg.id.to_string();
    let chain = convert::registrations(
        client
            .extension_chain(&id)
            .await
            .map_err(|e| not_found_as(e, "đăng ký", &reg.id))?,
    );
    if !ChainIndex::build(&chain).is_latest_in_chain(&reg.id) {
        debug!(id = %reg.id, "extension refused: row already extended");
        return Err(CoreError::validation(messages::NOT_EXTENDABLE));
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
async fn route_command(client: &Client, cmd: Command) -> Result<CommandResult, CoreError> {
    match cmd {
        // ── Registrations ────────────────────────────────────────
        Command::CreateRegistration(req) => {
            req.validate()?;
            Ok(registration(client.create_registration(&req.to_wire()?).await?))
        }

        Command::CreateForExistingUser(req) => {
            req.validate()?;
            Ok(registration(
                client.create_for_existing_user(&req.to_wire()?).await?,
            ))
        }

        Command::CreateWithUserVehicles(req) => {
            req.validate()?;
            Ok(registration(
                client.create_with_user_vehicles(&req.to_wire()?).await?,
            ))
        }

        Command::UpdateRegistration { id, update } => {
            update.validate()?;
            Ok(registration(
                client
                    .update_registration(&id.to_string(), &update.to_wire())
                    .await?,
            ))
        }

        Command::CancelRegistration { registration: reg } => {
            if reg.status.is_terminal() {
                return Err(CoreError::validation(messages::CANCELLED_TERMINAL));
            }
            if !reg.can_cancel() {
                return Err(CoreError::validation(messages::NOT_EDITABLE));
            }
            let body = RegistrationUpdate {
                status: Some(RegistrationStatus::Cancelled.to_string()),
                ..RegistrationUpdate::default()
            };
            Ok(registration(
                client.update_registration(&reg.id.to_string(), &body).await?,
            ))
        }

        Command::DeleteRegistration { id } => {
            client.delete_registration(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        Command::ExtendRegistration {
            registration: reg,
            request,
        } => {
            require_extendable(&reg)?;
            request.validate()?;
            require_chain_tail(client, &reg).await?;
            Ok(registration(
                client
                    .extend_registration(&reg.id.to_string(), &request.to_wire())
                    .await?,
            ))
        }

        Command::SmartExtend {
            registration: reg,
            request,
        } => {
            require_extendable(&reg)?;
            request.validate()?;
            require_chain_tail(client, &reg).await?;
            let id = reg.id.to_string();
            let raw = if reg.status == RegistrationStatus::Expired {
                client.extend_expired(&id, &request.to_wire()).await?
            } else {
                client.extend_registration(&id, &request.to_wire()).await?
            };
            Ok(registration(raw))
        }

        Command::PayRegistration {
            registration: reg,
            request,
        } => {
            if reg.status.is_terminal() {
                return Err(CoreError::validation(messages::CANCELLED_TERMINAL));
            }
            if !reg.can_pay() {
                return Err(CoreError::validation(messages::NOT_EDITABLE));
            }
            request.validate()?;
            Ok(registration(
                client
                    .pay_registration(&reg.id.to_string(), &request.to_wire())
                    .await?,
            ))
        }

        Command::UpdateMonths {
            registration: reg,
            months,
        } => {
            check_update_months(&reg, months)?;
            Ok(registration(
                client.update_months(&reg.id.to_string(), months).await?,
            ))
        }

        Command::UpdateExpired => {
            let sweep = client.update_expired().await?;
            info!(updated = sweep.updated, "expiry sweep finished");
            Ok(CommandResult::ExpiredSweep {
                updated: sweep.updated,
            })
        }

        // ── Users ────────────────────────────────────────────────
        Command::CreateUser(req) => {
            req.validate_new()?;
            Ok(CommandResult::User(
                client.create_user(&req.to_wire()).await?.into(),
            ))
        }
        Command::UpdateUser { id, update } => {
            update.validate_update()?;
            Ok(CommandResult::User(
                client
                    .update_user(&id.to_string(), &update.to_wire())
                    .await?
                    .into(),
            ))
        }
        Command::DeleteUser { id } => {
            client.delete_user(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        // ── Vehicles ─────────────────────────────────────────────
        Command::CreateVehicle(req) => {
            req.validate_new()?;
            Ok(CommandResult::Vehicle(
                client.create_vehicle(&req.to_wire()?).await?.into(),
            ))
        }
        Command::UpdateVehicle { id, update } => Ok(CommandResult::Vehicle(
            client
                .update_vehicle(&id.to_string(), &update.to_wire()?)
                .await?
                .into(),
        )),
        Command::DeleteVehicle { id } => {
            client.delete_vehicle(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }
        Command::CreateVehicleType(req) => {
            req.validate_new()?;
            Ok(CommandResult::VehicleType(
                client.create_vehicle_type(&req.to_wire()).await?.into(),
            ))
        }
        Command::UpdateVehicleType { id, update } => {
            update.validate_update()?;
            Ok(CommandResult::VehicleType(
                client
                    .update_vehicle_type(&id.to_string(), &update.to_wire())
                    .await?
                    .into(),
            ))
        }
        Command::DeleteVehicleType { id } => {
            client.delete_vehicle_type(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        // ── Back office ──────────────────────────────────────────
        Command::CreateStaff(req) => {
            req.validate_new()?;
            Ok(CommandResult::Staff(
                client.create_staff(&req.to_wire()).await?.into(),
            ))
        }
        Command::UpdateStaff { id, update } => Ok(CommandResult::Staff(
            client
                .update_staff(&id.to_string(), &update.to_wire())
                .await?
                .into(),
        )),
        Command::DeleteStaff { id } => {
            client.delete_staff(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }
        Command::CreateRole(req) => {
            req.validate_new()?;
            Ok(CommandResult::Role(
                client.create_role(&req.to_wire()).await?.into(),
            ))
        }
        Command::UpdateRole { id, update } => Ok(CommandResult::Role(
            client
                .update_role(&id.to_string(), &update.to_wire())
                .await?
                .into(),
        )),
        Command::DeleteRole { id } => {
            client.delete_role(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }
        Command::CreateAccount(req) => {
            req.validate_new()?;
            Ok(CommandResult::Account(
                client.create_account(&req.to_wire()).await?.into(),
            ))
        }
        Command::UpdateAccount { id, update } => Ok(CommandResult::Account(
            client
                .update_account(&id.to_string(), &update.to_wire())
                .await?
                .into(),
        )),
        Command::DeleteAccount { id } => {
            client.delete_account(&id.to_string()).await?;
            Ok(CommandResult::Ok)
        }

        // ── Gate ─────────────────────────────────────────────────
        Command::DirectEntry(req) => Ok(CommandResult::Transaction(
            client.direct_entry(&req.to_wire()?).await?.into(),
        )),
        Command::DirectExit { plate } => {
            let body = parkdesk_api::models::DirectExitRequest {
                plate: normalize_plate(&plate)?,
            };
            Ok(CommandResult::Transaction(
                client.direct_exit(&body).await?.into(),
            ))
        }
        Command::EnrollFace(req) => {
            let image = FaceImage::from_path(&req.image).await?;
            Ok(CommandResult::Face(
                client
                    .register_face(&req.user_id.to_string(), &image)
                    .await?
                    .into(),
            ))
        }
    }
}
