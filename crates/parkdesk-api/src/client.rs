// HTTP client for the parking backend
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token attachment and
// envelope decoding. Endpoint modules (registrations, users, etc.) are
// implemented as inherent methods in `services/` to keep this module focused
// on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};
use url::Url;

use crate::envelope;
use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Raw HTTP client for the parking backend.
///
/// Every request reads the bearer token from the shared [`Session`]. A `401`
/// from any endpoint tears the session down before the error is returned.
/// There is no retry: each method performs exactly one HTTP exchange.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl Client {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://parking.example.com/api`.
    pub fn new(
        base_url: Url,
        session: Arc<Session>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, session))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, session: Arc<Session>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build an endpoint URL from path segments. Each segment is
    /// percent-encoded, so plates with spaces or slashes are safe.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {} {:?}", url, params);
        let resp = self
            .authorize(self.http.get(url).query(params))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    /// POST without a body, for action endpoints like `/update-expired`.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.authorize(self.http.post(url)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self.authorize(self.http.put(url).json(body)).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PATCH {}", url);
        let resp = self
            .authorize(self.http.patch(url).json(body))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// DELETE, discarding whatever payload the backend echoes back.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.authorize(self.http.delete(url)).send().await?;
        let _: IgnoredAny = self.handle_response(resp).await?;
        Ok(())
    }

    /// Map the status, then decode the envelope.
    ///
    /// A `401` clears the session (memory and persistent store) so the next
    /// front-end action prompts for a fresh login.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend rejected credentials, clearing session");
            self.session.clear();
            return Err(Error::Authentication {
                message: envelope::message_of(&body)
                    .unwrap_or_else(|| "session expired or invalid credentials".into()),
            });
        }

        envelope::decode(status, &body)
    }
}

/// Ensure the base URL ends with `/` so relative joins keep the API prefix.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        Client::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Arc::new(Session::anonymous()),
        )
    }

    #[test]
    fn endpoint_keeps_api_prefix() {
        let c = client("https://parking.local/api");
        let url = c.endpoint(&["dang-ky-thang", "history", "51A-123.45"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://parking.local/api/dang-ky-thang/history/51A-123.45"
        );
    }

    #[test]
    fn endpoint_encodes_segments() {
        let c = client("http://localhost:3000/");
        let url = c.endpoint(&["dang-ky-thang", "bien-so-xe", "51A 123/45"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/dang-ky-thang/bien-so-xe/51A%20123%2F45"
        );
    }
}
