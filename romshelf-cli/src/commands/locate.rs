use std::process::ExitCode;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_lib::{Resolution, ResolveError, Resolver};

use crate::commands::Inputs;
use crate::error::CliError;

/// Resolve one game and print its archive and disk image paths.
pub(crate) fn run_locate(inputs: Inputs, game: &str) -> Result<ExitCode, CliError> {
    let resolver = Resolver::new(&inputs.catalog, &inputs.dirs);
    let Some(entry) = inputs.catalog.get(game) else {
        return Err(CliError::unknown_game(game));
    };

    if let Some(ref desc) = entry.description {
        log::info!(
            "{} ({})",
            entry.name.if_supports_color(Stdout, |t| t.bold()),
            desc
        );
    }

    let archive = match resolver.resolve(game) {
        Ok(Resolution::Resolved { archive_path }) => archive_path,
        Ok(Resolution::NotFound) => {
            log::warn!("{game}: not found");
            return Ok(ExitCode::FAILURE);
        }
        Err(ResolveError::UnknownGame(name)) => return Err(CliError::unknown_game(name)),
        Err(e) => {
            log::error!("{game}: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    match archive {
        Some(path) => log::info!(
            "  archive: {}",
            path.display().if_supports_color(Stdout, |t| t.cyan())
        ),
        None => log::info!(
            "  archive: {}",
            "none needed".if_supports_color(Stdout, |t| t.dimmed())
        ),
    }
    for disk in &entry.disk_images {
        match resolver.disk_image_path(game, &disk.name) {
            Some(path) => log::info!(
                "  disk {}: {}",
                disk.name,
                path.display().if_supports_color(Stdout, |t| t.cyan())
            ),
            None => log::info!(
                "  disk {}: {}",
                disk.name,
                "no dump".if_supports_color(Stdout, |t| t.dimmed())
            ),
        }
    }

    Ok(ExitCode::SUCCESS)
}
