use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_lib::settings::{self, PathKey};

use crate::error::CliError;

/// Show the settings file and the paths it holds.
pub(crate) fn run_config_show() {
    let path = settings::settings_path();

    log::info!(
        "{}",
        "romshelf settings".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let saved = settings::load_paths();
    for key in [PathKey::Catalog, PathKey::Dirlist] {
        match saved.get(key) {
            Some(p) => log::info!("  {:<8} {}", key.key(), p.display()),
            None => log::info!(
                "  {:<8} {}",
                key.key(),
                "(not set)".if_supports_color(Stdout, |t| t.dimmed())
            ),
        }
    }

    if let Some(contents) = settings::load_settings_string() {
        log::info!("");
        for line in contents.lines() {
            log::info!("  {line}");
        }
    }
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings::settings_path().display());
}

/// Save one of the default paths.
pub(crate) fn run_config_set(key: PathKey, path: &Path) -> Result<(), CliError> {
    let absolute = std::path::absolute(path)?;
    if !absolute.is_file() {
        log::warn!("{} does not exist (saving anyway)", absolute.display());
    }
    settings::save_path(key, Some(&absolute))
        .map_err(|e| CliError::config(format!("Could not write settings: {e}")))?;
    log::info!(
        "{} {} = {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key.key(),
        absolute.display()
    );
    Ok(())
}
