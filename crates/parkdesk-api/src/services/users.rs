use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{UserDto, UserPayload};

impl Client {
    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<UserDto>, Error> {
        let url = self.endpoint(&["users"])?;
        self.get(url).await
    }

    /// `GET /users/:id`
    pub async fn get_user(&self, id: &str) -> Result<UserDto, Error> {
        let url = self.endpoint(&["users", id])?;
        self.get(url).await
    }

    /// `POST /users`
    pub async fn create_user(&self, body: &UserPayload) -> Result<UserDto, Error> {
        debug!(name = ?body.full_name, "creating user");
        let url = self.endpoint(&["users"])?;
        self.post(url, body).await
    }

    /// `PUT /users/:id`
    pub async fn update_user(&self, id: &str, body: &UserPayload) -> Result<UserDto, Error> {
        let url = self.endpoint(&["users", id])?;
        self.put(url, body).await
    }

    /// `DELETE /users/:id`
    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting user");
        let url = self.endpoint(&["users", id])?;
        self.delete(url).await
    }
}
