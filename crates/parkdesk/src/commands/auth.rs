//! Session commands: login, logout, whoami, dashboard.

use dialoguer::Input;
use secrecy::SecretString;
use tabled::Tabled;

use parkdesk_core::{Controller, Registration, UserDashboard, Vehicle};

use crate::cli::GlobalOpts;
use crate::config::{self, KeyringTokenStore};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    controller: &Controller,
    username: Option<String>,
    global: &GlobalOpts,
    profile: &str,
) -> Result<(), CliError> {
    let remembered = config::load_config_or_default()
        .profiles
        .get(profile)
        .and_then(|p| p.username.clone());

    let username = match username.or(remembered) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Tên đăng nhập")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = rpassword::prompt_password("Mật khẩu: ").map_err(util::prompt_err)?;
    let password = SecretString::from(password);

    let pb = util::spinner("Đang đăng nhập...", global.quiet);
    let user = controller.login(&username, &password).await;
    pb.finish_and_clear();

    let user = user.map_err(|e| match CliError::from(e) {
        CliError::AuthFailed { message, .. } => CliError::AuthFailed {
            message,
            profile: profile.into(),
        },
        other => other,
    })?;

    let name = user
        .and_then(|u| u.full_name.or(u.username))
        .unwrap_or(username);
    output::notice(&format!("Đăng nhập thành công: {name}"), global.quiet);
    Ok(())
}

pub fn logout(controller: &Controller, global: &GlobalOpts, profile: &str) {
    use parkdesk_core::TokenStore;

    controller.logout();
    KeyringTokenStore::new(profile).clear();
    output::notice("Đã đăng xuất", global.quiet);
}

pub async fn whoami(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let dash = controller.dashboard().await?;
    let Some(user) = dash.user else {
        output::print_output("(token hợp lệ, không có hồ sơ khách hàng)", global.quiet);
        return Ok(());
    };
    let out = output::render_single(
        &global.output,
        &user,
        |u| {
            [
                format!("ID:        {}", u.id),
                format!("Họ tên:    {}", output::opt(u.full_name.as_ref())),
                format!("CCCD:      {}", output::opt(u.cccd.as_ref())),
                format!("Mã NV:     {}", output::opt(u.employee_code.as_ref())),
            ]
            .join("\n")
        },
        |u| u.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Dashboard ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DashRow {
    #[tabled(rename = "Biển số")]
    plate: String,
    #[tabled(rename = "Loại xe")]
    kind: String,
    #[tabled(rename = "Đăng ký")]
    registration: String,
    #[tabled(rename = "Hết hạn")]
    expires: String,
}

fn dashboard_rows(dash: &UserDashboard, color: bool) -> Vec<DashRow> {
    dash.vehicles
        .iter()
        .map(|v: &Vehicle| {
            let latest: Option<&Registration> = dash
                .registrations
                .iter()
                .filter(|r| r.plate.eq_ignore_ascii_case(&v.plate))
                .max_by_key(|r| r.extension_seq);
            DashRow {
                plate: v.plate.clone(),
                kind: output::opt(v.vehicle_type_name.as_ref()),
                registration: latest
                    .map_or_else(|| "-".into(), |r| output::status_label(r.status, color)),
                expires: latest
                    .and_then(|r| r.expires_at)
                    .map_or_else(|| "-".into(), |t| t.format("%d/%m/%Y").to_string()),
            }
        })
        .collect()
}

pub async fn dashboard(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let dash = controller.dashboard().await?;
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &dash,
        |d| {
            let header = d
                .user
                .as_ref()
                .and_then(|u| u.full_name.clone())
                .unwrap_or_else(|| "Khách hàng".into());
            let table = tabled::Table::new(dashboard_rows(d, color))
                .with(tabled::settings::Style::rounded())
                .to_string();
            format!(
                "{header}\nXe: {}  Đăng ký: {}\n{table}",
                d.vehicles.len(),
                d.registrations.len()
            )
        },
        |d| {
            d.vehicles
                .iter()
                .map(|v| v.plate.clone())
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
