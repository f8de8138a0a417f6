//! CLI configuration: thin wrapper around `parkdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--api-url`, `--token`, `--insecure`, `--timeout`).

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use parkdesk_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use parkdesk_config::{
    Config, KeyringTokenStore, Profile, config_path, load_config_or_default,
    parse_api_url, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-joined profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ControllerConfig` from the config file, profile, and flags.
///
/// Flag values beat profile values. Without a profile, `--api-url` alone
/// is enough; the keyring entry is still keyed by the profile name.
pub fn build_controller_config(
    global: &GlobalOpts,
) -> Result<(ControllerConfig, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut config = match (cfg.profiles.get(&profile_name), global.api_url.as_deref()) {
        (Some(profile), _) => {
            let mut config = parkdesk_config::profile_to_controller_config(profile, &profile_name)?;
            if let Some(url) = global.api_url.as_deref() {
                config.url = parse_api_url(url)?;
            }
            config
        }
        (None, Some(url)) => ControllerConfig::new(parse_api_url(url)?)
            .with_store(Arc::new(KeyringTokenStore::new(profile_name.clone()))),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout);
    if let Some(token) = global.token.as_deref().filter(|t| !t.is_empty()) {
        config = config.with_token(SecretString::from(token.to_owned()));
    }

    Ok((config, profile_name))
}
