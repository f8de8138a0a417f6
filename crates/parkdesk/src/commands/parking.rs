//! Gate and statistics handlers.

use tabled::Tabled;

use parkdesk_core::{
    Command as CoreCommand, CommandResult, Controller, DIRECTORY_PAGE_SIZE, DirectEntryRequest,
    ParkingTransaction,
};

use crate::cli::{GlobalOpts, OutputFormat, ParkingArgs, ParkingCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Biển số")]
    plate: String,
    #[tabled(rename = "Vào")]
    entered: String,
    #[tabled(rename = "Ra")]
    exited: String,
    #[tabled(rename = "Phí")]
    fee: String,
    #[tabled(rename = "Vé tháng")]
    monthly: String,
}

fn time(t: Option<chrono::DateTime<chrono::Utc>>) -> String {
    t.map_or_else(|| "-".into(), |t| t.format("%d/%m %H:%M").to_string())
}

impl From<&ParkingTransaction> for TransactionRow {
    fn from(t: &ParkingTransaction) -> Self {
        Self {
            id: t.id.to_string(),
            plate: t.plate.clone(),
            entered: time(t.entered_at),
            exited: time(t.exited_at),
            fee: output::money(t.fee),
            monthly: output::check(t.monthly_pass),
        }
    }
}

fn transaction_detail(t: &ParkingTransaction) -> String {
    let row = TransactionRow::from(t);
    [
        format!("ID:        {}", row.id),
        format!("Biển số:   {}", row.plate),
        format!("Vào:       {}", row.entered),
        format!("Ra:        {}", row.exited),
        format!("Phí:       {}", row.fee),
        format!("Vé tháng:  {}", if t.monthly_pass { "có" } else { "không" }),
    ]
    .join("\n")
}

async fn gate(
    controller: &Controller,
    cmd: CoreCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let message = cmd.success_message();
    if let CommandResult::Transaction(t) = controller.execute(cmd).await? {
        output::notice(message, global.quiet);
        let out =
            output::render_single(&global.output, &t, transaction_detail, |t| t.id.to_string())?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

pub async fn handle(
    controller: &Controller,
    args: ParkingArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ParkingCommand::List { open, page } => {
            let mut rows = controller.parking_transactions().await?;
            if open {
                rows.retain(ParkingTransaction::is_open);
            }
            let (slice, footer) = util::page(&rows, &page, DIRECTORY_PAGE_SIZE);
            let out = output::render_list(
                &global.output,
                slice,
                |t| TransactionRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            if !footer.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::notice(&footer, global.quiet);
            }
            Ok(())
        }

        ParkingCommand::Entry {
            plate,
            vehicle_type,
        } => {
            let req = DirectEntryRequest {
                plate,
                vehicle_type_id: util::opt_id(vehicle_type.as_deref()),
            };
            gate(controller, CoreCommand::DirectEntry(req), global).await
        }

        ParkingCommand::Exit { plate } => {
            gate(controller, CoreCommand::DirectExit { plate }, global).await
        }

        ParkingCommand::Fee(arg) => {
            let quote = controller.fee_quote(&util::id(&arg.id)).await?;
            let out = output::render_single(
                &global.output,
                &quote,
                |q| {
                    let hours = q.hours.map_or_else(|| "-".into(), |h| format!("{h:.1}"));
                    format!("Phí:     {}\nSố giờ:  {hours}", output::money(q.fee))
                },
                |q| q.fee.map(|f| f.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ParkingCommand::Stats { from, to } => {
            let from = util::parse_opt_date("from", from.as_deref())?;
            let to = util::parse_opt_date("to", to.as_deref())?;
            let stats = controller.parking_statistics(from, to).await?;
            let out = output::render_single(
                &global.output,
                &stats,
                |s| {
                    [
                        format!("Lượt vào:   {}", s.entries),
                        format!("Lượt ra:    {}", s.exits),
                        format!("Đang gửi:   {}", s.currently_parked),
                        format!("Doanh thu:  {}", output::money(s.revenue)),
                    ]
                    .join("\n")
                },
                |s| s.currently_parked.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
