// ── Runtime connection configuration ──
//
// Describes how to reach the backend and where the session token lives.
// Never touches disk itself: the CLI/TUI build a `ControllerConfig` from
// their profile and hand it in.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use parkdesk_api::{MemoryTokenStore, TlsMode, TokenStore, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed staging servers).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Clone)]
pub struct ControllerConfig {
    /// API root, e.g. `https://parking.example.com/api`.
    pub url: Url,
    /// Token supplied out of band (flag or env). Takes precedence over the
    /// store and is never written back to it.
    pub token: Option<SecretString>,
    /// Persistent token home used by `login`/`logout`.
    pub token_store: Arc<dyn TokenStore>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ControllerConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            token: None,
            token_store: Arc::new(MemoryTokenStore::new()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = store;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
