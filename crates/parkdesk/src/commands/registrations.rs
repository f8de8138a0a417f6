//! Monthly registration command handlers.

use chrono::Utc;
use tabled::Tabled;

use parkdesk_core::{
    ActiveCheck, ChainIndex, Command as CoreCommand, CommandResult, Controller,
    CreateRegistrationRequest, ExistingUserRequest, ExtendRegistrationRequest, NewCustomerRequest,
    PaymentRequest, REGISTRATION_PAGE_SIZE, Registration, SearchField, SearchQuery,
    UpdateRegistrationRequest, UserRequest,
};

use crate::cli::{ExtendArgs, GlobalOpts, PageArgs, RegistrationsArgs, RegistrationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RegistrationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Biển số")]
    plate: String,
    #[tabled(rename = "Chủ xe")]
    holder: String,
    #[tabled(rename = "Tháng")]
    months: u32,
    #[tabled(rename = "Bắt đầu")]
    starts: String,
    #[tabled(rename = "Hết hạn")]
    expires: String,
    #[tabled(rename = "Trạng thái")]
    status: String,
    #[tabled(rename = "Thanh toán")]
    payment: String,
    #[tabled(rename = "Lần GH")]
    seq: u32,
    #[tabled(rename = "Latest")]
    latest: String,
    #[tabled(rename = "Editable")]
    editable: String,
}

fn date(t: Option<chrono::DateTime<Utc>>) -> String {
    t.map_or_else(|| "-".into(), |t| t.format("%d/%m/%Y").to_string())
}

fn row(r: &Registration, index: &ChainIndex, color: bool) -> RegistrationRow {
    RegistrationRow {
        id: r.id.to_string(),
        plate: r.plate.clone(),
        holder: output::opt(r.holder_name.as_ref()),
        months: r.months,
        starts: date(r.starts_at),
        expires: date(r.expires_at),
        status: output::status_label(r.status, color),
        payment: r.payment_status.label_vi().into(),
        seq: r.extension_seq,
        latest: output::check(index.is_latest_in_chain(&r.id)),
        editable: output::check(r.can_edit() && !r.status.is_terminal()),
    }
}

fn detail(r: &Registration) -> String {
    let mut lines = vec![
        format!("ID:          {}", r.id),
        format!("Biển số:     {}", r.plate),
        format!("Chủ xe:      {}", output::opt(r.holder_name.as_ref())),
        format!("CCCD:        {}", output::opt(r.cccd.as_ref())),
        format!("Mã NV:       {}", output::opt(r.employee_code.as_ref())),
        format!("Số tháng:    {}", r.months),
        format!("Bắt đầu:     {}", date(r.starts_at)),
        format!("Hết hạn:     {}", date(r.expires_at)),
        format!("Số tiền:     {}", output::money(r.amount)),
        format!("Trạng thái:  {}", r.status.label_vi()),
        format!("Thanh toán:  {}", r.payment_status.label_vi()),
        format!("Gia hạn lần: {}", r.extension_seq),
    ];
    if let Some(parent) = &r.parent_id {
        lines.push(format!("Gia hạn từ:  {parent}"));
    }
    if let Some(days) = r.days_remaining(Utc::now()) {
        lines.push(format!("Còn lại:     {days} ngày"));
    }
    if let Some(note) = &r.note {
        lines.push(format!("Ghi chú:     {note}"));
    }
    lines.join("\n")
}

fn print_rows(
    rows: &[Registration],
    page: Option<&PageArgs>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let index = ChainIndex::build(rows);
    let color = output::should_color(&global.color);
    let (slice, footer) = match page {
        Some(args) => util::page(rows, args, REGISTRATION_PAGE_SIZE),
        None => (rows, String::new()),
    };
    let out = output::render_list(
        &global.output,
        slice,
        |r| row(r, &index, color),
        |r| r.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    if matches!(global.output, crate::cli::OutputFormat::Table) && !footer.is_empty() {
        output::notice(&footer, global.quiet);
    }
    Ok(())
}

fn print_one(r: &Registration, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, r, detail, |r| r.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_result(
    result: &CommandResult,
    message: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    output::notice(message, global.quiet);
    if let CommandResult::Registration(r) = result {
        print_one(r, global)?;
    }
    Ok(())
}

/// Fetch the row a row-scoped command acts on.
async fn load(controller: &Controller, id: &str) -> Result<Box<Registration>, CliError> {
    Ok(Box::new(controller.registration(&util::id(id)).await?))
}

async fn run(
    controller: &Controller,
    cmd: CoreCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if cmd.is_destructive() || matches!(cmd, CoreCommand::PayRegistration { .. }) {
        let prompt = match &cmd {
            CoreCommand::CancelRegistration { registration } => {
                format!("Hủy đăng ký {} ({})?", registration.id, registration.plate)
            }
            CoreCommand::PayRegistration {
                registration,
                request,
            } => format!(
                "Xác nhận thanh toán {} cho {}?",
                output::money(request.amount.or(registration.amount)),
                registration.plate
            ),
            _ => "Thao tác này không thể hoàn tác. Tiếp tục?".into(),
        };
        if !util::confirm(&prompt, global.yes)? {
            return Ok(());
        }
    }
    let message = cmd.success_message();
    let pb = util::spinner("Đang xử lý...", global.quiet);
    let result = controller.execute(cmd).await;
    pb.finish_and_clear();
    print_result(&result?, message, global)
}

fn search_query(
    plate: Option<String>,
    cccd: Option<String>,
    employee: Option<String>,
    status: Option<String>,
) -> Result<SearchQuery, CliError> {
    let (field, text) = if let Some(p) = plate {
        (SearchField::Plate, p)
    } else if let Some(c) = cccd {
        (SearchField::Cccd, c)
    } else if let Some(e) = employee {
        (SearchField::EmployeeCode, e)
    } else if let Some(s) = status {
        (SearchField::Status, s)
    } else {
        return Err(CliError::Validation {
            field: "search".into(),
            reason: "one of --plate, --cccd, --employee, --status is required".into(),
        });
    };
    Ok(SearchQuery::new(field, text))
}

fn extend_request(args: &ExtendArgs) -> ExtendRegistrationRequest {
    ExtendRegistrationRequest {
        months: args.months,
        note: args.note.clone(),
    }
}

fn print_active_check(check: &ActiveCheck, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(
        &global.output,
        check,
        |c| {
            let verdict = if c.is_active {
                "đang có vé tháng hiệu lực"
            } else {
                "không có vé tháng hiệu lực"
            };
            let mut lines = vec![format!("{}: {verdict}", c.plate)];
            lines.extend(c.message.clone());
            if let Some(r) = &c.registration {
                lines.push(String::new());
                lines.push(detail(r));
            }
            lines.join("\n")
        },
        |c| c.is_active.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    controller: &Controller,
    args: RegistrationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegistrationsCommand::List(page) => {
            let rows = controller.registrations().await?;
            print_rows(&rows, Some(&page), global)
        }

        RegistrationsCommand::Search {
            plate,
            cccd,
            employee,
            status,
            page,
        } => {
            let query = search_query(plate, cccd, employee, status)?;
            let rows = controller.search_registrations(&query).await?;
            if rows.is_empty() {
                output::notice("Không tìm thấy đăng ký nào", global.quiet);
                return Ok(());
            }
            print_rows(&rows, Some(&page), global)
        }

        RegistrationsCommand::Get(arg) => {
            let r = load(controller, &arg.id).await?;
            print_one(&r, global)
        }

        RegistrationsCommand::Create {
            plate,
            months,
            user_id,
            start,
            amount,
            note,
        } => {
            let req = CreateRegistrationRequest {
                plate,
                months,
                user_id: util::opt_id(user_id.as_deref()),
                starts_on: util::parse_opt_date("start", start.as_deref())?,
                amount,
                note,
            };
            run(controller, CoreCommand::CreateRegistration(req), global).await
        }

        RegistrationsCommand::CreateExisting {
            user_id,
            cccd,
            plate,
            months,
            note,
        } => {
            let req = ExistingUserRequest {
                user_id: util::opt_id(user_id.as_deref()),
                cccd,
                plate,
                months,
                note,
            };
            run(controller, CoreCommand::CreateForExistingUser(req), global).await
        }

        RegistrationsCommand::CreateWithUser {
            name,
            cccd,
            phone,
            email,
            employee_code,
            plates,
            vehicle_type,
            months,
            note,
        } => {
            let req = NewCustomerRequest {
                user: UserRequest {
                    full_name: Some(name),
                    cccd: Some(cccd),
                    phone,
                    email,
                    employee_code,
                },
                plates,
                vehicle_type_id: util::opt_id(vehicle_type.as_deref()),
                months,
                note,
            };
            run(controller, CoreCommand::CreateWithUserVehicles(req), global).await
        }

        RegistrationsCommand::Update {
            id,
            start,
            amount,
            note,
        } => {
            let update = UpdateRegistrationRequest {
                starts_on: util::parse_opt_date("start", start.as_deref())?,
                amount,
                note,
            };
            let cmd = CoreCommand::UpdateRegistration {
                id: util::id(&id),
                update,
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::Extend(args) => {
            let cmd = CoreCommand::ExtendRegistration {
                registration: load(controller, &args.id).await?,
                request: extend_request(&args),
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::SmartExtend(args) => {
            let cmd = CoreCommand::SmartExtend {
                registration: load(controller, &args.id).await?,
                request: extend_request(&args),
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::Pay { id, amount, method } => {
            let cmd = CoreCommand::PayRegistration {
                registration: load(controller, &id).await?,
                request: PaymentRequest { amount, method },
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::UpdateMonths { id, months } => {
            let cmd = CoreCommand::UpdateMonths {
                registration: load(controller, &id).await?,
                months,
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::Cancel(arg) => {
            let cmd = CoreCommand::CancelRegistration {
                registration: load(controller, &arg.id).await?,
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::Delete(arg) => {
            let cmd = CoreCommand::DeleteRegistration {
                id: util::id(&arg.id),
            };
            run(controller, cmd, global).await
        }

        RegistrationsCommand::Chain(arg) => {
            let rows = controller.extension_chain(&util::id(&arg.id)).await?;
            print_rows(&rows, None, global)
        }

        RegistrationsCommand::History { plate } => {
            let rows = controller.vehicle_history(&plate).await?;
            if rows.is_empty() {
                output::notice("Xe chưa có lịch sử đăng ký", global.quiet);
                return Ok(());
            }
            print_rows(&rows, None, global)
        }

        RegistrationsCommand::Active { plate } => {
            match controller.active_registration(&plate).await? {
                Some(r) => print_one(&r, global),
                None => Err(CliError::NotFound {
                    resource_type: "active registration".into(),
                    identifier: plate,
                    list_command: "registrations history <PLATE>".into(),
                }),
            }
        }

        RegistrationsCommand::CheckActive { plate } => {
            let check = controller.check_active(&plate).await?;
            print_active_check(&check, global)
        }

        RegistrationsCommand::UpdateExpired => {
            let cmd = CoreCommand::UpdateExpired;
            let message = cmd.success_message();
            let result = controller.execute(cmd).await?;
            if let CommandResult::ExpiredSweep { updated } = result {
                output::notice(&format!("{message}: {updated}"), global.quiet);
            }
            Ok(())
        }
    }
}
