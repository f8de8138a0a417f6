//! Vehicle and vehicle-type command handlers.

use tabled::Tabled;

use parkdesk_core::{
    Command as CoreCommand, CommandResult, Controller, DIRECTORY_PAGE_SIZE, Vehicle,
    VehicleRequest, VehicleType, VehicleTypeRequest,
};

use crate::cli::{
    GlobalOpts, OutputFormat, VehicleFields, VehicleTypeFields, VehicleTypesArgs,
    VehicleTypesCommand, VehiclesArgs, VehiclesCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Vehicles ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Biển số")]
    plate: String,
    #[tabled(rename = "Loại xe")]
    kind: String,
    #[tabled(rename = "Chủ xe")]
    owner: String,
    #[tabled(rename = "Màu")]
    color: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id.to_string(),
            plate: v.plate.clone(),
            kind: v
                .vehicle_type_name
                .clone()
                .or_else(|| v.vehicle_type_id.as_ref().map(ToString::to_string))
                .unwrap_or_else(|| "-".into()),
            owner: output::opt(v.owner_id.as_ref()),
            color: output::opt(v.color.as_ref()),
        }
    }
}

fn vehicle_detail(v: &Vehicle) -> String {
    let row = VehicleRow::from(v);
    [
        format!("ID:       {}", row.id),
        format!("Biển số:  {}", row.plate),
        format!("Loại xe:  {}", row.kind),
        format!("Chủ xe:   {}", row.owner),
        format!("Màu:      {}", row.color),
    ]
    .join("\n")
}

fn vehicle_request(fields: VehicleFields) -> VehicleRequest {
    VehicleRequest {
        plate: fields.plate,
        vehicle_type_id: util::opt_id(fields.vehicle_type.as_deref()),
        owner_id: util::opt_id(fields.owner.as_deref()),
        color: fields.color,
    }
}

async fn execute(
    controller: &Controller,
    cmd: CoreCommand,
    global: &GlobalOpts,
) -> Result<CommandResult, CliError> {
    let message = cmd.success_message();
    let result = controller.execute(cmd).await?;
    output::notice(message, global.quiet);
    Ok(result)
}

pub async fn handle(
    controller: &Controller,
    args: VehiclesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VehiclesCommand::List(page) => {
            let vehicles = controller.vehicles().await?;
            let (slice, footer) = util::page(&vehicles, &page, DIRECTORY_PAGE_SIZE);
            let out = output::render_list(&global.output, slice, |v| VehicleRow::from(v), |v| {
                v.plate.clone()
            })?;
            output::print_output(&out, global.quiet);
            if !footer.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::notice(&footer, global.quiet);
            }
            Ok(())
        }

        VehiclesCommand::Get(arg) => {
            let v = controller.vehicle(&util::id(&arg.id)).await?;
            let out = output::render_single(&global.output, &v, vehicle_detail, |v| {
                v.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehiclesCommand::Create(fields) => {
            let cmd = CoreCommand::CreateVehicle(vehicle_request(fields));
            if let CommandResult::Vehicle(v) = execute(controller, cmd, global).await? {
                output::print_output(&vehicle_detail(&v), global.quiet);
            }
            Ok(())
        }

        VehiclesCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateVehicle {
                id: util::id(&id),
                update: vehicle_request(fields),
            };
            execute(controller, cmd, global).await.map(|_| ())
        }

        VehiclesCommand::Delete(arg) => {
            if !util::confirm(&format!("Xóa xe {}?", arg.id), global.yes)? {
                return Ok(());
            }
            let cmd = CoreCommand::DeleteVehicle {
                id: util::id(&arg.id),
            };
            execute(controller, cmd, global).await.map(|_| ())
        }
    }
}

// ── Vehicle types ───────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleTypeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tên")]
    name: String,
    #[tabled(rename = "Giá tháng")]
    monthly: String,
    #[tabled(rename = "Giá lượt")]
    per_visit: String,
}

impl From<&VehicleType> for VehicleTypeRow {
    fn from(t: &VehicleType) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            monthly: output::money(t.monthly_price),
            per_visit: output::money(t.per_visit_price),
        }
    }
}

fn type_request(fields: VehicleTypeFields) -> VehicleTypeRequest {
    VehicleTypeRequest {
        name: fields.name,
        monthly_price: fields.monthly_price,
        per_visit_price: fields.per_visit_price,
    }
}

pub async fn handle_types(
    controller: &Controller,
    args: VehicleTypesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VehicleTypesCommand::List => {
            let types = controller.vehicle_types().await?;
            let out = output::render_list(&global.output, &types, |t| VehicleTypeRow::from(t), |t| {
                t.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehicleTypesCommand::Create(fields) => {
            let cmd = CoreCommand::CreateVehicleType(type_request(fields));
            execute(controller, cmd, global).await.map(|_| ())
        }

        VehicleTypesCommand::Update { id, fields } => {
            let cmd = CoreCommand::UpdateVehicleType {
                id: util::id(&id),
                update: type_request(fields),
            };
            execute(controller, cmd, global).await.map(|_| ())
        }

        VehicleTypesCommand::Delete(arg) => {
            if !util::confirm(&format!("Xóa loại xe {}?", arg.id), global.yes)? {
                return Ok(());
            }
            let cmd = CoreCommand::DeleteVehicleType {
                id: util::id(&arg.id),
            };
            execute(controller, cmd, global).await.map(|_| ())
        }
    }
}
