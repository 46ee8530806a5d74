use std::process::ExitCode;
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_lib::report::{CheckLine, CheckOutcome, check_all, summarize};

use crate::commands::Inputs;
use crate::error::CliError;

/// Resolve `games` (or the whole catalog) and print one line per game.
pub(crate) fn run_check(
    inputs: Inputs,
    games: Vec<String>,
    jobs: usize,
    missing_only: bool,
) -> Result<ExitCode, CliError> {
    let names = if games.is_empty() {
        inputs.catalog.all_names()
    } else {
        games
    };
    log::debug!("Checking {} game(s) with {} job(s)", names.len(), jobs.max(1));

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let lines = rt.block_on(check_all(
        Arc::new(inputs.catalog),
        Arc::new(inputs.dirs),
        names,
        jobs,
    ));

    for line in &lines {
        if missing_only && matches!(line.outcome, CheckOutcome::Found { .. }) {
            continue;
        }
        print_line(line);
    }

    let summary = summarize(&lines);
    log::info!("");
    log::info!(
        "{} checked: {} found, {} not found, {} error(s)",
        summary.total(),
        summary.found.if_supports_color(Stdout, |t| t.green()),
        summary.not_found.if_supports_color(Stdout, |t| t.yellow()),
        summary.errors.if_supports_color(Stdout, |t| t.red()),
    );

    Ok(if summary.errors > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_line(line: &CheckLine) {
    let name = line.name.if_supports_color(Stdout, |t| t.bold());
    match &line.outcome {
        CheckOutcome::Found { archive, disks } => {
            match archive {
                Some(path) => log::info!(
                    "{}  {}",
                    name,
                    path.display().if_supports_color(Stdout, |t| t.green())
                ),
                None => log::info!(
                    "{}  {}",
                    name,
                    "(no archive)".if_supports_color(Stdout, |t| t.green())
                ),
            }
            for (disk, path) in disks {
                log::info!(
                    "    {}  {}",
                    disk,
                    path.display().if_supports_color(Stdout, |t| t.dimmed())
                );
            }
        }
        CheckOutcome::NotFound => {
            log::info!(
                "{}  {}",
                name,
                "not found".if_supports_color(Stdout, |t| t.yellow())
            );
        }
        CheckOutcome::Error(msg) => {
            log::info!(
                "{}  {} {}",
                name,
                "error:".if_supports_color(Stdout, |t| t.red()),
                msg
            );
        }
    }
}
