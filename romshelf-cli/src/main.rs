//! romshelf CLI
//!
//! Command-line interface for locating and verifying arcade ROM sets.

mod cli_types;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;

use romshelf_lib::settings::PathKey;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Could not open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            e.exit_code()
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Commands::Check {
            games,
            jobs,
            missing_only,
        } => {
            let inputs = commands::load_inputs(cli.catalog, cli.dirlist)?;
            commands::check::run_check(inputs, games, jobs, missing_only)
        }
        Commands::Locate { game } => {
            let inputs = commands::load_inputs(cli.catalog, cli.dirlist)?;
            commands::locate::run_locate(inputs, &game)
        }
        Commands::Stat { path } => {
            let inputs = commands::load_inputs(cli.catalog, cli.dirlist)?;
            commands::vfs::run_stat(inputs, &path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cat { path } => {
            let inputs = commands::load_inputs(cli.catalog, cli.dirlist)?;
            commands::vfs::run_cat(inputs, &path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Ls { path } => {
            let inputs = commands::load_inputs(cli.catalog, cli.dirlist)?;
            commands::vfs::run_ls(inputs, &path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::run_config_show(),
                ConfigAction::Path => commands::config::run_config_path(),
                ConfigAction::SetCatalog { path } => {
                    commands::config::run_config_set(PathKey::Catalog, &path)?
                }
                ConfigAction::SetDirlist { path } => {
                    commands::config::run_config_set(PathKey::Dirlist, &path)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
