//! `parkdesk`: the monthly parking registration backend from the shell.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use parkdesk_core::Controller;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { global, command } = Cli::parse();
    init_logging(global.verbose);

    match run(command, &global).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so `-o json` output stays parseable. `-v` raises the
/// default level and `RUST_LOG` overrides it.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Config(args) => commands::config_cmd::handle(args, global),
        Command::Completions(args) => {
            print_completions(args.shell);
            Ok(())
        }
        cmd => {
            let (controller_config, profile) = config::build_controller_config(global)?;
            let controller = Controller::new(controller_config)?;
            tracing::debug!(command = ?cmd, %profile, "dispatching");
            commands::dispatch(cmd, &controller, global, &profile).await
        }
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "parkdesk", &mut std::io::stdout());
}
