pub(crate) mod check;
pub(crate) mod config;
pub(crate) mod locate;
pub(crate) mod vfs;

use std::path::PathBuf;

use romshelf_dat::{GameCatalog, SearchList, load_listxml};
use romshelf_lib::settings::{self, PathKey};

use crate::error::CliError;

/// Catalog and directory list for commands that resolve sets.
pub(crate) struct Inputs {
    pub catalog: GameCatalog,
    pub dirs: SearchList,
}

/// Load the catalog and directory list, from flags or saved settings.
pub(crate) fn load_inputs(
    catalog: Option<PathBuf>,
    dirlist: Option<PathBuf>,
) -> Result<Inputs, CliError> {
    let catalog_path = settings::resolve_path(catalog, PathKey::Catalog).ok_or_else(|| {
        CliError::config("No catalog given; pass --catalog or run `romshelf config set-catalog`")
    })?;
    let dirlist_path = settings::resolve_path(dirlist, PathKey::Dirlist).ok_or_else(|| {
        CliError::config("No directory list given; pass --dirlist or run `romshelf config set-dirlist`")
    })?;

    let (catalog, report) = load_listxml(&catalog_path)
        .map_err(|e| CliError::catalog(format!("{}: {}", catalog_path.display(), e)))?;
    if !report.duplicates.is_empty() {
        log::warn!(
            "{} duplicate game name(s) in {}",
            report.duplicates.len(),
            catalog_path.display()
        );
    }
    log::debug!("Loaded {} games from {}", report.games, catalog_path.display());

    let dirs = SearchList::load(&dirlist_path)
        .map_err(|e| CliError::catalog(format!("{}: {}", dirlist_path.display(), e)))?;
    if dirs.is_empty() {
        log::warn!("Directory list {} is empty", dirlist_path.display());
    }

    Ok(Inputs { catalog, dirs })
}
