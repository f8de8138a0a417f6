//! Customer command handlers.

use tabled::Tabled;

use parkdesk_core::{Command as CoreCommand, Controller, DIRECTORY_PAGE_SIZE, User, UserRequest};

use crate::cli::{GlobalOpts, UserFields, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Họ tên")]
    name: String,
    #[tabled(rename = "CCCD")]
    cccd: String,
    #[tabled(rename = "Điện thoại")]
    phone: String,
    #[tabled(rename = "Mã NV")]
    employee_code: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: output::opt(u.full_name.as_ref()),
            cccd: output::opt(u.cccd.as_ref()),
            phone: output::opt(u.phone.as_ref()),
            employee_code: output::opt(u.employee_code.as_ref()),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("ID:          {}", u.id),
        format!("Họ tên:      {}", output::opt(u.full_name.as_ref())),
        format!("CCCD:        {}", output::opt(u.cccd.as_ref())),
        format!("Điện thoại:  {}", output::opt(u.phone.as_ref())),
        format!("Email:       {}", output::opt(u.email.as_ref())),
        format!("Mã NV:       {}", output::opt(u.employee_code.as_ref())),
        format!("Trạng thái:  {}", output::opt(u.status.as_ref())),
    ]
    .join("\n")
}

fn request(fields: UserFields) -> UserRequest {
    UserRequest {
        full_name: fields.name,
        cccd: fields.cccd,
        phone: fields.phone,
        email: fields.email,
        employee_code: fields.employee_code,
    }
}

fn print_user(user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, user, detail, |u| u.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(page) => {
            let users = controller.users().await?;
            let (slice, footer) = util::page(&users, &page, DIRECTORY_PAGE_SIZE);
            let out =
                output::render_list(&global.output, slice, |u| UserRow::from(u), |u| u.id.to_string())?;
            output::print_output(&out, global.quiet);
            if !footer.is_empty() && matches!(global.output, crate::cli::OutputFormat::Table) {
                output::notice(&footer, global.quiet);
            }
            Ok(())
        }

        UsersCommand::Get(arg) => print_user(&controller.user(&util::id(&arg.id)).await?, global),

        UsersCommand::Create(fields) => {
            let cmd = CoreCommand::CreateUser(request(fields));
            let message = cmd.success_message();
            if let parkdesk_core::CommandResult::User(user) = controller.execute(cmd).await? {
                output::notice(message, global.quiet);
                print_user(&user, global)?;
            }
            Ok(())
        }

        UsersCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateUser {
                id: util::id(&id),
                update: request(fields),
            };
            let message = cmd.success_message();
            controller.execute(cmd).await?;
            output::notice(message, global.quiet);
            Ok(())
        }

        UsersCommand::Delete(arg) => {
            if !util::confirm(&format!("Xóa khách hàng {}?", arg.id), global.yes)? {
                return Ok(());
            }
            let cmd = CoreCommand::DeleteUser {
                id: util::id(&arg.id),
            };
            let message = cmd.success_message();
            controller.execute(cmd).await?;
            output::notice(message, global.quiet);
            Ok(())
        }
    }
}
