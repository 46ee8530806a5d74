//! Shared settings: where the catalog and directory list live.
//!
//! The settings file is `~/.config/romshelf/settings.toml`:
//!
//! ```toml
//! [paths]
//! catalog = "/data/mame/listxml.xml"
//! dirlist = "/data/mame/dirs.txt"
//! ```

use std::io;
use std::path::{Path, PathBuf};

/// Keys of the `[paths]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKey {
    Catalog,
    Dirlist,
}

impl PathKey {
    pub fn key(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Dirlist => "dirlist",
        }
    }
}

/// Paths read from the settings file. Either may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct SavedPaths {
    pub catalog: Option<PathBuf>,
    pub dirlist: Option<PathBuf>,
}

impl SavedPaths {
    pub fn get(&self, key: PathKey) -> Option<&Path> {
        match key {
            PathKey::Catalog => self.catalog.as_deref(),
            PathKey::Dirlist => self.dirlist.as_deref(),
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct SettingsFile {
    #[serde(default)]
    paths: SavedPaths,
}

/// Canonical path to the settings file: `~/.config/romshelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romshelf").join("settings.toml")
}

/// Read `[paths]` from the settings file at `file`.
///
/// A missing or unparseable file reads as no saved paths; empty strings
/// count as unset.
pub fn load_paths_from(file: &Path) -> SavedPaths {
    let Ok(contents) = std::fs::read_to_string(file) else {
        return SavedPaths::default();
    };
    let parsed: SettingsFile = match toml::from_str(&contents) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Ignoring unreadable settings file {}: {}", file.display(), e);
            return SavedPaths::default();
        }
    };
    let non_empty = |p: Option<PathBuf>| p.filter(|p| !p.as_os_str().is_empty());
    SavedPaths {
        catalog: non_empty(parsed.paths.catalog),
        dirlist: non_empty(parsed.paths.dirlist),
    }
}

/// Read `[paths]` from the shared settings file.
pub fn load_paths() -> SavedPaths {
    load_paths_from(&settings_path())
}

/// Pick a path: the command-line value, else the saved one.
pub fn resolve_path(cli_override: Option<PathBuf>, key: PathKey) -> Option<PathBuf> {
    cli_override.or_else(|| load_paths().get(key).map(Path::to_path_buf))
}

/// Save (or clear) one `[paths]` key in the settings file at `file`.
///
/// Uses `toml::Value` for a surgical update so other tables and keys are
/// kept, and writes through a temporary file renamed into place.
pub fn save_path_to(file: &Path, key: PathKey, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(file) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let paths = table
        .entry("paths")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let paths_table = paths
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[paths] is not a table"))?;

    match path {
        Some(p) => {
            paths_table.insert(
                key.key().to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            paths_table.remove(key.key());
        }
    }

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = file.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, file)?;

    Ok(())
}

/// Save (or clear) one `[paths]` key in the shared settings file.
pub fn save_path(key: PathKey, path: Option<&Path>) -> io::Result<()> {
    save_path_to(&settings_path(), key, path)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
