//! `parkdesk-tui`: terminal back office for monthly parking registrations.
//!
//! Screens are navigable via number keys (1-4): overview, registrations,
//! customers and vehicles. Without a stored session the app opens on the
//! login form.
//!
//! Logs go to a file under the platform data dir so they never corrupt the
//! terminal.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use parkdesk_core::{Controller, ControllerConfig};

use crate::app::App;

/// Terminal back office for monthly parking registrations.
#[derive(Parser, Debug)]
#[command(name = "parkdesk-tui", version, about)]
struct Cli {
    /// Profile from config.toml (defaults to the configured default)
    #[arg(short = 'p', long, env = "PARKDESK_PROFILE")]
    profile: Option<String>,

    /// Backend API root (e.g. http://localhost:3000/api); overrides the profile
    #[arg(short = 'u', long, env = "PARKDESK_API_URL")]
    api_url: Option<String>,

    /// Session token; skips the login form
    #[arg(long, env = "PARKDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log file path (defaults to the parkdesk log dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Holding the guard keeps the writer flushing.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkdesk_tui={log_level},parkdesk_core={log_level},parkdesk_api={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| parkdesk_config::log_dir().join("parkdesk-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("cannot create log dir {}", log_dir.display()))?;
    let log_filename = log_file
        .file_name()
        .map_or_else(|| "parkdesk-tui.log".into(), std::ffi::OsStr::to_os_string);

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

/// Flags beat the profile; with neither, fall back to the local default
/// backend and an in-memory session.
fn build_controller(cli: &Cli) -> Result<Controller> {
    let cfg = parkdesk_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());

    let mut config = match (&cli.api_url, cfg.profiles.get(&profile_name)) {
        (None, Some(profile)) => {
            parkdesk_config::profile_to_controller_config(profile, &profile_name)?
        }
        (url, _) => {
            let raw = url.as_deref().unwrap_or("http://localhost:3000/api");
            let url = parkdesk_config::parse_api_url(raw)?;
            ControllerConfig::new(url).with_store(Arc::new(
                parkdesk_config::KeyringTokenStore::new(profile_name.clone()),
            ))
        }
    };
    if let Some(ref token) = cli.token {
        config = config.with_token(SecretString::from(token.clone()));
    }

    info!(url = %config.url, profile = %profile_name, "starting parkdesk-tui");
    Ok(Controller::new(config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal switches to raw mode.
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli)?;

    let controller = build_controller(&cli)?;
    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
