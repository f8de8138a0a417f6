//! Shared configuration for the parkdesk CLI and TUI.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), the
//! keyring-backed [`TokenStore`], and translation to
//! `parkdesk_core::ControllerConfig`. The CLI layers its global flags on
//! top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use parkdesk_core::{ControllerConfig, TlsVerification, TokenStore};

/// Keyring service name.
pub const KEYRING_SERVICE: &str = "parkdesk";

/// Environment variable holding a bearer token.
pub const TOKEN_ENV: &str = "PARKDESK_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is absent.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use, honouring an explicit override.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root, e.g. "http://localhost:3000/api".
    pub api_url: String,

    /// Username remembered for `login` prompts.
    pub username: Option<String>,

    /// Bearer token in plaintext (prefer the keyring).
    pub token: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Request timeout override, seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "parkdesk", "parkdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("parkdesk");
    p
}

/// Directory for TUI log files.
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "parkdesk", "parkdesk").map_or_else(
        || dirs_fallback().join("logs"),
        |dirs| dirs.data_local_dir().join("logs"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then `path`, then `PARKDESK_*` variables (`__` separates
/// nested keys, e.g. `PARKDESK_DEFAULTS__OUTPUT=json`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PARKDESK_").split("__").only(&[
            "default_profile",
            "defaults.output",
            "defaults.color",
            "defaults.timeout",
        ]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring token store ─────────────────────────────────────────────

/// Keeps a profile's bearer token in the OS keyring under
/// `parkdesk` / `<profile>/token`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    profile: String,
}

impl KeyringTokenStore {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self) -> Option<keyring::Entry> {
        match keyring::Entry::new(KEYRING_SERVICE, &format!("{}/token", self.profile)) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(profile = %self.profile, error = %e, "keyring unavailable");
                None
            }
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<SecretString> {
        let secret = self.entry()?.get_password().ok()?;
        debug!(profile = %self.profile, "token loaded from keyring");
        Some(SecretString::from(secret))
    }

    fn save(&self, token: &SecretString) {
        if let Some(entry) = self.entry() {
            if let Err(e) = entry.set_password(token.expose_secret()) {
                warn!(profile = %self.profile, error = %e, "failed to store token in keyring");
            }
        }
    }

    fn clear(&self) {
        if let Some(entry) = self.entry() {
            match entry.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!(profile = %self.profile, error = %e, "failed to clear keyring token"),
            }
        }
    }
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve a bearer token: `PARKDESK_TOKEN` → keyring → plaintext profile.
/// `None` means the user has to log in.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    let env = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
    resolve_token_from(
        env,
        || KeyringTokenStore::new(profile_name).load(),
        profile,
    )
}

fn resolve_token_from(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<SecretString>,
    profile: &Profile,
) -> Option<SecretString> {
    if let Some(token) = env {
        return Some(SecretString::from(token));
    }
    if let Some(token) = keyring() {
        return Some(token);
    }
    profile
        .token
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.clone()))
}

/// Parse and check a profile's `api_url`.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Build a `ControllerConfig` from a profile, without CLI overrides.
///
/// An out-of-band token (env or plaintext) is used as-is; the keyring
/// store stays attached so `login`/`logout` persist.
pub fn profile_to_controller_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_api_url(&profile.api_url)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ControllerConfig::new(url)
        .with_store(Arc::new(KeyringTokenStore::new(profile_name)));
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));
    if let Some(token) = resolve_token_from(
        std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
        || None,
        profile,
    ) {
        config = config.with_token(token);
    }
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile(url: &str) -> Profile {
        Profile {
            api_url: url.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "office"

[defaults]
output = "json"

[profiles.office]
api_url = "https://parking.example.com/api"
username = "admin"
timeout = 10
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("office"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        let office = cfg.profile("office").unwrap();
        assert_eq!(office.username.as_deref(), Some("admin"));
        assert_eq!(office.timeout, Some(10));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), profile("http://localhost:3000/api"));
        save_config_to(&cfg, &path).unwrap();

        let back = load_config_from(&path).unwrap();
        assert_eq!(
            back.profile("default").unwrap().api_url,
            "http://localhost:3000/api"
        );
    }

    #[test]
    fn active_profile_prefers_explicit_name() {
        let cfg = Config::default();
        assert_eq!(cfg.active_profile_name(Some("lab")), "lab");
        assert_eq!(cfg.active_profile_name(None), "default");
        assert!(matches!(
            cfg.profile("lab"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn token_resolution_order() {
        let mut p = profile("http://localhost/api");
        p.token = Some("plain".into());

        let from_env = resolve_token_from(Some("env".into()), || None, &p).unwrap();
        assert_eq!(from_env.expose_secret(), "env");

        let from_keyring =
            resolve_token_from(None, || Some(SecretString::from("ring")), &p).unwrap();
        assert_eq!(from_keyring.expose_secret(), "ring");

        let plain = resolve_token_from(None, || None, &p).unwrap();
        assert_eq!(plain.expose_secret(), "plain");

        p.token = Some(String::new());
        assert!(resolve_token_from(None, || None, &p).is_none());
    }

    #[test]
    fn api_url_must_be_http() {
        assert!(parse_api_url("http://localhost:3000/api").is_ok());
        assert!(matches!(
            parse_api_url("ftp://host"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn profile_maps_tls_and_timeout() {
        let mut p = profile("https://parking.example.com/api");
        p.insecure = Some(true);
        p.timeout = Some(5);
        let cfg = profile_to_controller_config(&p, "default").unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.url.as_str(), "https://parking.example.com/api");
    }
}
