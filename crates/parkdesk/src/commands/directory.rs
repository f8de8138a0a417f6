//! Back-office handlers: staff, roles and login accounts.

use secrecy::SecretString;
use tabled::Tabled;

use parkdesk_core::{
    Account, AccountRequest, Command as CoreCommand, Controller, Role, RoleRequest, Staff,
    StaffRequest,
};

use crate::cli::{
    AccountFields, AccountsArgs, AccountsCommand, GlobalOpts, RoleFields, RolesArgs, RolesCommand,
    StaffArgs, StaffCommand, StaffFields,
};
use crate::error::CliError;
use crate::output;

use super::util;

async fn execute(
    controller: &Controller,
    cmd: CoreCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if cmd.is_destructive() && !util::confirm("Thao tác này không thể hoàn tác. Tiếp tục?", global.yes)? {
        return Ok(());
    }
    let message = cmd.success_message();
    controller.execute(cmd).await?;
    output::notice(message, global.quiet);
    Ok(())
}

// ── Staff ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Họ tên")]
    name: String,
    #[tabled(rename = "Mã NV")]
    code: String,
    #[tabled(rename = "Chức vụ")]
    position: String,
    #[tabled(rename = "Điện thoại")]
    phone: String,
}

impl From<&Staff> for StaffRow {
    fn from(s: &Staff) -> Self {
        Self {
            id: s.id.to_string(),
            name: output::opt(s.full_name.as_ref()),
            code: output::opt(s.employee_code.as_ref()),
            position: output::opt(s.position.as_ref()),
            phone: output::opt(s.phone.as_ref()),
        }
    }
}

fn staff_request(f: StaffFields) -> StaffRequest {
    StaffRequest {
        full_name: f.name,
        employee_code: f.employee_code,
        position: f.position,
        phone: f.phone,
        email: f.email,
    }
}

pub async fn handle_staff(
    controller: &Controller,
    args: StaffArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StaffCommand::List => {
            let staff = controller.staff().await?;
            let out = output::render_list(
                &global.output,
                &staff,
                |s| StaffRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        StaffCommand::Create(fields) => {
            execute(controller, CoreCommand::CreateStaff(staff_request(fields)), global).await
        }
        StaffCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateStaff {
                id: util::id(&id),
                update: staff_request(fields),
            };
            execute(controller, cmd, global).await
        }
        StaffCommand::Delete(arg) => {
            let cmd = CoreCommand::DeleteStaff {
                id: util::id(&arg.id),
            };
            execute(controller, cmd, global).await
        }
    }
}

// ── Roles ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tên")]
    name: String,
    #[tabled(rename = "Mô tả")]
    description: String,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            description: output::opt(r.description.as_ref()),
        }
    }
}

fn role_request(f: RoleFields) -> RoleRequest {
    RoleRequest {
        name: f.name,
        description: f.description,
    }
}

pub async fn handle_roles(
    controller: &Controller,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List => {
            let roles = controller.roles().await?;
            let out = output::render_list(
                &global.output,
                &roles,
                |r| RoleRow::from(r),
                |r| r.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        RolesCommand::Create(fields) => {
            execute(controller, CoreCommand::CreateRole(role_request(fields)), global).await
        }
        RolesCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateRole {
                id: util::id(&id),
                update: role_request(fields),
            };
            execute(controller, cmd, global).await
        }
        RolesCommand::Delete(arg) => {
            let cmd = CoreCommand::DeleteRole {
                id: util::id(&arg.id),
            };
            execute(controller, cmd, global).await
        }
    }
}

// ── Accounts ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tên đăng nhập")]
    username: String,
    #[tabled(rename = "Vai trò")]
    role: String,
    #[tabled(rename = "Trạng thái")]
    status: String,
}

impl From<&Account> for AccountRow {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id.to_string(),
            username: a.username.clone(),
            role: output::opt(a.role_id.as_ref()),
            status: output::opt(a.status.as_ref()),
        }
    }
}

fn account_request(f: AccountFields, ask_password: bool) -> Result<AccountRequest, CliError> {
    let password = if ask_password || f.password {
        let pw = rpassword::prompt_password("Mật khẩu: ").map_err(util::prompt_err)?;
        Some(SecretString::from(pw))
    } else {
        None
    };
    Ok(AccountRequest {
        username: f.username,
        password,
        role_id: util::opt_id(f.role.as_deref()),
        status: f.status,
    })
}

pub async fn handle_accounts(
    controller: &Controller,
    args: AccountsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountsCommand::List => {
            let accounts = controller.accounts().await?;
            let out = output::render_list(
                &global.output,
                &accounts,
                |a| AccountRow::from(a),
                |a| a.username.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        AccountsCommand::Create(fields) => {
            let req = account_request(fields, true)?;
            execute(controller, CoreCommand::CreateAccount(req), global).await
        }
        AccountsCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateAccount {
                id: util::id(&id),
                update: account_request(fields, false)?,
            };
            execute(controller, cmd, global).await
        }
        AccountsCommand::Delete(arg) => {
            let cmd = CoreCommand::DeleteAccount {
                id: util::id(&arg.id),
            };
            execute(controller, cmd, global).await
        }
    }
}
