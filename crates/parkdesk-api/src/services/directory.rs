// Back-office directory endpoints: staff, roles and login accounts.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{AccountDto, AccountPayload, RoleDto, RolePayload, StaffDto, StaffPayload};

impl Client {
    // ── Staff ────────────────────────────────────────────────────────

    /// `GET /staff`
    pub async fn list_staff(&self) -> Result<Vec<StaffDto>, Error> {
        let url = self.endpoint(&["staff"])?;
        self.get(url).await
    }

    /// `GET /staff/:id`
    pub async fn get_staff(&self, id: &str) -> Result<StaffDto, Error> {
        let url = self.endpoint(&["staff", id])?;
        self.get(url).await
    }

    /// `POST /staff`
    pub async fn create_staff(&self, body: &StaffPayload) -> Result<StaffDto, Error> {
        debug!(code = ?body.employee_code, "creating staff member");
        let url = self.endpoint(&["staff"])?;
        self.post(url, body).await
    }

    /// `PUT /staff/:id`
    pub async fn update_staff(&self, id: &str, body: &StaffPayload) -> Result<StaffDto, Error> {
        let url = self.endpoint(&["staff", id])?;
        self.put(url, body).await
    }

    /// `DELETE /staff/:id`
    pub async fn delete_staff(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["staff", id])?;
        self.delete(url).await
    }

    // ── Roles ────────────────────────────────────────────────────────

    /// `GET /roles`
    pub async fn list_roles(&self) -> Result<Vec<RoleDto>, Error> {
        let url = self.endpoint(&["roles"])?;
        self.get(url).await
    }

    /// `GET /roles/:id`
    pub async fn get_role(&self, id: &str) -> Result<RoleDto, Error> {
        let url = self.endpoint(&["roles", id])?;
        self.get(url).await
    }

    /// `POST /roles`
    pub async fn create_role(&self, body: &RolePayload) -> Result<RoleDto, Error> {
        debug!(name = ?body.name, "creating role");
        let url = self.endpoint(&["roles"])?;
        self.post(url, body).await
    }

    /// `PUT /roles/:id`
    pub async fn update_role(&self, id: &str, body: &RolePayload) -> Result<RoleDto, Error> {
        let url = self.endpoint(&["roles", id])?;
        self.put(url, body).await
    }

    /// `DELETE /roles/:id`
    pub async fn delete_role(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["roles", id])?;
        self.delete(url).await
    }

    // ── Accounts ─────────────────────────────────────────────────────

    /// `GET /accounts`
    pub async fn list_accounts(&self) -> Result<Vec<AccountDto>, Error> {
        let url = self.endpoint(&["accounts"])?;
        self.get(url).await
    }

    /// `GET /accounts/:id`
    pub async fn get_account(&self, id: &str) -> Result<AccountDto, Error> {
        let url = self.endpoint(&["accounts", id])?;
        self.get(url).await
    }

    /// `POST /accounts`
    pub async fn create_account(&self, body: &AccountPayload) -> Result<AccountDto, Error> {
        debug!(username = ?body.username, "creating account");
        let url = self.endpoint(&["accounts"])?;
        self.post(url, body).await
    }

    /// `PUT /accounts/:id`
    pub async fn update_account(&self, id: &str, body: &AccountPayload) -> Result<AccountDto, Error> {
        let url = self.endpoint(&["accounts", id])?;
        self.put(url, body).await
    }

    /// `DELETE /accounts/:id`
    pub async fn delete_account(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint(&["accounts", id])?;
        self.delete(url).await
    }
}
