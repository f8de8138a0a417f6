// Login and the user-facing dashboard.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::Client;
use crate::error::Error;
use crate::models::{DashboardDto, LoginResponse};

impl Client {
    /// Authenticate and store the issued bearer token in the session.
    ///
    /// `POST /login`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.endpoint(&["login"])?;
        debug!(username, "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp: LoginResponse = self.post(url, &body).await.map_err(|e| match e {
            Error::Api { message, .. } => Error::Authentication { message },
            other => other,
        })?;

        if resp.access_token.is_empty() {
            return Err(Error::Authentication {
                message: "backend returned an empty access token".into(),
            });
        }

        self.session().store_login(
            SecretString::from(resp.access_token.clone()),
            resp.user.clone(),
        );
        info!(username, "login successful");
        Ok(resp)
    }

    /// Summary for the logged-in user: profile, vehicles, passes.
    ///
    /// `GET /user/dashboard`
    pub async fn user_dashboard(&self) -> Result<DashboardDto, Error> {
        if !self.session().is_authenticated() {
            return Err(Error::MissingToken);
        }
        let url = self.endpoint(&["user", "dashboard"])?;
        self.get(url).await
    }
}
