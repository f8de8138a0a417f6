// Monthly registration endpoints (`/dang-ky-thang`)
//
// Every lookup and lifecycle action on a parking pass. Each method performs
// a single request and returns the decoded payload.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{
    ActiveCheckDto, ExistingUserRegistration, ExpiredSweepDto, ExtendRequest, NewRegistration,
    PaymentRequest, RegistrationDto, RegistrationUpdate, UpdateMonthsRequest,
    UserVehiclesRegistration,
};

const ROOT: &str = "dang-ky-thang";

impl Client {
    // ── Listing & lookups ────────────────────────────────────────────

    /// List every registration.
    ///
    /// `GET /dang-ky-thang`
    pub async fn list_registrations(&self) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT])?;
        self.get(url).await
    }

    /// `GET /dang-ky-thang/:id`
    pub async fn get_registration(&self, id: &str) -> Result<RegistrationDto, Error> {
        let url = self.endpoint(&[ROOT, id])?;
        self.get(url).await
    }

    /// Registrations for one license plate.
    ///
    /// `GET /dang-ky-thang/bien-so-xe/:plate`
    pub async fn registrations_by_plate(&self, plate: &str) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "bien-so-xe", plate])?;
        self.get(url).await
    }

    /// Registrations held by the owner of a national ID card.
    ///
    /// `GET /dang-ky-thang/cccd/:id`
    pub async fn registrations_by_cccd(&self, cccd: &str) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "cccd", cccd])?;
        self.get(url).await
    }

    /// `GET /dang-ky-thang/nhan-vien/:code`
    pub async fn registrations_by_employee(
        &self,
        code: &str,
    ) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "nhan-vien", code])?;
        self.get(url).await
    }

    /// `GET /dang-ky-thang/trang-thai/:status`
    pub async fn registrations_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "trang-thai", status])?;
        self.get(url).await
    }

    /// The currently active pass for a plate, if any.
    ///
    /// `GET /dang-ky-thang/active/:plate`
    pub async fn active_registration(&self, plate: &str) -> Result<Option<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "active", plate])?;
        match self.get(url).await {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    /// `GET /dang-ky-thang/check-active/:plate`
    pub async fn check_active(&self, plate: &str) -> Result<ActiveCheckDto, Error> {
        let url = self.endpoint(&[ROOT, "check-active", plate])?;
        self.get(url).await
    }

    /// Every registration a plate has ever held, extensions included.
    ///
    /// `GET /dang-ky-thang/history/:plate`
    pub async fn registration_history(&self, plate: &str) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, "history", plate])?;
        self.get(url).await
    }

    /// The chain a registration belongs to, root first.
    ///
    /// `GET /dang-ky-thang/:id/extension-chain`
    pub async fn extension_chain(&self, id: &str) -> Result<Vec<RegistrationDto>, Error> {
        let url = self.endpoint(&[ROOT, id, "extension-chain"])?;
        self.get(url).await
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// `POST /dang-ky-thang`
    pub async fn create_registration(
        &self,
        body: &NewRegistration,
    ) -> Result<RegistrationDto, Error> {
        debug!(plate = %body.plate, months = body.months, "creating registration");
        let url = self.endpoint(&[ROOT])?;
        self.post(url, body).await
    }

    /// Register a pass for a customer who already has an account.
    ///
    /// `POST /dang-ky-thang/existing-user`
    pub async fn create_for_existing_user(
        &self,
        body: &ExistingUserRegistration,
    ) -> Result<RegistrationDto, Error> {
        debug!(plate = %body.plate, "creating registration for existing user");
        let url = self.endpoint(&[ROOT, "existing-user"])?;
        self.post(url, body).await
    }

    /// Create a customer, their vehicles and a pass together.
    ///
    /// `POST /dang-ky-thang/user-vehicles`
    pub async fn create_with_user_vehicles(
        &self,
        body: &UserVehiclesRegistration,
    ) -> Result<RegistrationDto, Error> {
        debug!(vehicles = body.vehicles.len(), "creating user with vehicles");
        let url = self.endpoint(&[ROOT, "user-vehicles"])?;
        self.post(url, body).await
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// `PUT /dang-ky-thang/:id`
    pub async fn update_registration(
        &self,
        id: &str,
        body: &RegistrationUpdate,
    ) -> Result<RegistrationDto, Error> {
        let url = self.endpoint(&[ROOT, id])?;
        self.put(url, body).await
    }

    /// `DELETE /dang-ky-thang/:id`
    pub async fn delete_registration(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting registration");
        let url = self.endpoint(&[ROOT, id])?;
        self.delete(url).await
    }

    /// Extend the tail of a chain. The backend creates a new row with
    /// `parentId = id`.
    ///
    /// `POST /dang-ky-thang/:id/extend`
    pub async fn extend_registration(
        &self,
        id: &str,
        body: &ExtendRequest,
    ) -> Result<RegistrationDto, Error> {
        debug!(id, months = body.months, "extending registration");
        let url = self.endpoint(&[ROOT, id, "extend"])?;
        self.post(url, body).await
    }

    /// Extend a pass that has already lapsed; coverage restarts today.
    ///
    /// `POST /dang-ky-thang/:id/extend-expired`
    pub async fn extend_expired(
        &self,
        id: &str,
        body: &ExtendRequest,
    ) -> Result<RegistrationDto, Error> {
        debug!(id, months = body.months, "extending expired registration");
        let url = self.endpoint(&[ROOT, id, "extend-expired"])?;
        self.post(url, body).await
    }

    /// Record payment. Moves payment to COMPLETE and status to ACTIVE.
    ///
    /// `POST /dang-ky-thang/:id/payment`
    pub async fn pay_registration(
        &self,
        id: &str,
        body: &PaymentRequest,
    ) -> Result<RegistrationDto, Error> {
        debug!(id, "recording payment");
        let url = self.endpoint(&[ROOT, id, "payment"])?;
        self.post(url, body).await
    }

    /// `PATCH /dang-ky-thang/:id/update-months`
    pub async fn update_months(&self, id: &str, months: u32) -> Result<RegistrationDto, Error> {
        debug!(id, months, "updating month count");
        let url = self.endpoint(&[ROOT, id, "update-months"])?;
        self.patch(url, &UpdateMonthsRequest { months }).await
    }

    /// Run the backend's expiry sweep now.
    ///
    /// `POST /dang-ky-thang/update-expired`
    pub async fn update_expired(&self) -> Result<ExpiredSweepDto, Error> {
        let url = self.endpoint(&[ROOT, "update-expired"])?;
        let sweep: Option<ExpiredSweepDto> = self.post_empty(url).await?;
        Ok(sweep.unwrap_or_default())
    }
}
