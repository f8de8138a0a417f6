//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod directory;
pub mod face;
pub mod parking;
pub mod registrations;
pub mod users;
pub mod util;
pub mod vehicles;

use parkdesk_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
    profile: &str,
) -> Result<(), CliError> {
    match cmd {
        Command::Login { username } => auth::login(controller, username, global, profile).await,
        Command::Logout => {
            auth::logout(controller, global, profile);
            Ok(())
        }
        cmd => {
            util::require_login(controller, profile)?;
            match cmd {
                Command::Whoami => auth::whoami(controller, global).await,
                Command::Dashboard => auth::dashboard(controller, global).await,
                Command::Registrations(args) => registrations::handle(controller, args, global).await,
                Command::Users(args) => users::handle(controller, args, global).await,
                Command::Vehicles(args) => vehicles::handle(controller, args, global).await,
                Command::VehicleTypes(args) => {
                    vehicles::handle_types(controller, args, global).await
                }
                Command::Staff(args) => directory::handle_staff(controller, args, global).await,
                Command::Roles(args) => directory::handle_roles(controller, args, global).await,
                Command::Accounts(args) => {
                    directory::handle_accounts(controller, args, global).await
                }
                Command::Parking(args) => parking::handle(controller, args, global).await,
                Command::Face(args) => face::handle(controller, args, global).await,
                Command::Login { .. }
                | Command::Logout
                | Command::Config(_)
                | Command::Completions(_) => Err(CliError::Internal(
                    "command should have been handled before dispatch".into(),
                )),
            }
        }
    }
}
