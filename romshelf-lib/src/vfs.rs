//! Read-only virtual filesystem view over resolved sets.
//!
//! Layout:
//!
//! ```text
//! /                     every resolved archive, plus a directory per game with disk images
//! /<game>.zip           the archive credited to <game>
//! /<game>/              directory holding <game>'s disk images
//! /<game>/<disk>.chd    a verified disk image
//! ```
//!
//! Nothing here talks to a kernel filesystem interface. A mount loop maps
//! these operations one to one and returns [`VfsError::errno`] on failure.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::SystemTime;

use thiserror::Error;

use crate::archive::ARCHIVE_EXTENSION;
use crate::disk_image::DISK_IMAGE_EXTENSION;
use crate::error::ResolveError;
use crate::resolver::{Resolution, Resolver};

/// Permission bits of every file.
pub const FILE_MODE: u32 = 0o444;
/// Permission bits of every directory.
pub const DIR_MODE: u32 = 0o555;

/// Failures of a filesystem operation, each with an errno.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The path names a game the catalog does not have
    #[error("No such game: {0}")]
    InvalidArgument(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Is a directory: {0}")]
    IsADirectory(String),

    /// Resolution failed, or the backing file could not be read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl VfsError {
    pub fn io(path: &str, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Io {
            path: path.to_string(),
            source: source.into(),
        }
    }

    /// The errno a filesystem binding would report.
    pub fn errno(&self) -> libc::c_int {
        match self {
            Self::InvalidArgument(_) => libc::EINVAL,
            Self::NotFound(_) => libc::ENOENT,
            Self::NotADirectory(_) => libc::ENOTDIR,
            Self::IsADirectory(_) => libc::EISDIR,
            Self::Io { .. } => libc::EIO,
        }
    }
}

/// A parsed virtual path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VfsPath {
    Root,
    Archive { game: String },
    GameDir { game: String },
    DiskImage { game: String, disk: String },
    /// Any shape the layout does not define
    Other,
}

/// Parse a virtual path. Leading and trailing slashes are ignored.
pub fn parse_path(path: &str) -> VfsPath {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return VfsPath::Root;
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.iter().any(|p| p.is_empty() || *p == "." || *p == "..") {
        return VfsPath::Other;
    }

    match parts.as_slice() {
        [name] => match strip_extension(name, ARCHIVE_EXTENSION) {
            Some(game) => VfsPath::Archive {
                game: game.to_string(),
            },
            None => VfsPath::GameDir {
                game: name.to_string(),
            },
        },
        [game, file] => match strip_extension(file, DISK_IMAGE_EXTENSION) {
            Some(disk) => VfsPath::DiskImage {
                game: game.to_string(),
                disk: disk.to_string(),
            },
            None => VfsPath::Other,
        },
        _ => VfsPath::Other,
    }
}

fn strip_extension<'a>(name: &'a str, ext: &str) -> Option<&'a str> {
    name.strip_suffix(ext)?
        .strip_suffix('.')
        .filter(|stem| !stem.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

/// Attributes of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttr {
    pub kind: NodeKind,
    pub size: u64,
    /// Permission bits, without the file-type bits
    pub mode: u32,
    pub mtime: Option<SystemTime>,
}

impl NodeAttr {
    fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            size: 0,
            mode: DIR_MODE,
            mtime: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// One directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

/// The filesystem view. Resolves lazily on first access to each game.
pub struct Vfs<'a> {
    resolver: Resolver<'a>,
}

impl<'a> Vfs<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    pub fn getattr(&self, path: &str) -> Result<NodeAttr, VfsError> {
        match parse_path(path) {
            VfsPath::Root => Ok(NodeAttr::directory()),
            VfsPath::GameDir { game } => {
                self.disk_directory(path, &game)?;
                Ok(NodeAttr::directory())
            }
            VfsPath::Other => Err(VfsError::NotFound(path.to_string())),
            file => {
                let backing = self.backing_file(path, &file)?;
                let meta = std::fs::metadata(&backing).map_err(|e| VfsError::io(path, e))?;
                Ok(NodeAttr {
                    kind: NodeKind::File,
                    size: meta.len(),
                    mode: FILE_MODE,
                    mtime: meta.modified().ok(),
                })
            }
        }
    }

    /// Open the backing file of a file node, read-only.
    pub fn open(&self, path: &str) -> Result<File, VfsError> {
        let backing = self.file_path(path)?;
        File::open(&backing).map_err(|e| VfsError::io(path, e))
    }

    /// Read up to `len` bytes at `offset`. Short only at end of file.
    pub fn read(&self, path: &str, offset: u64, len: usize) -> Result<Vec<u8>, VfsError> {
        let mut file = self.open(path)?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| VfsError::io(path, e))?;
        let mut buf = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| VfsError::io(path, e))?;
        Ok(buf)
    }

    /// List a directory, sorted by name.
    ///
    /// The root resolves every catalog entry to decide which archives exist.
    /// An entry whose resolution fails is left out of the listing.
    pub fn readdir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let mut entries = Vec::new();
        match parse_path(path) {
            VfsPath::Root => {
                let catalog = self.resolver.catalog();
                for name in catalog.all_names() {
                    match self.resolver.resolve(&name) {
                        Ok(Resolution::Resolved {
                            archive_path: Some(_),
                        }) => entries.push(DirEntry {
                            name: format!("{name}.{ARCHIVE_EXTENSION}"),
                            kind: NodeKind::File,
                        }),
                        Ok(_) => {}
                        Err(e) => log::debug!("Leaving {name} out of the listing: {e}"),
                    }
                    if catalog.get(&name).is_some_and(|e| e.has_disk_images()) {
                        entries.push(DirEntry {
                            name,
                            kind: NodeKind::Directory,
                        });
                    }
                }
            }
            VfsPath::GameDir { game } => {
                self.disk_directory(path, &game)?;
                match self.resolver.resolve(&game) {
                    Ok(Resolution::Resolved { .. }) => {
                        if let Some(state) = self.resolver.state(&game) {
                            entries.extend(state.disk_locations.keys().map(|disk| DirEntry {
                                name: format!("{disk}.{DISK_IMAGE_EXTENSION}"),
                                kind: NodeKind::File,
                            }));
                        }
                    }
                    Ok(Resolution::NotFound) => {}
                    Err(e) => return Err(resolve_error(path, e)),
                }
            }
            VfsPath::Other => return Err(VfsError::NotFound(path.to_string())),
            _ => return Err(VfsError::NotADirectory(path.to_string())),
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Check that `game` exists and has disk images, so has a directory.
    fn disk_directory(&self, path: &str, game: &str) -> Result<(), VfsError> {
        let entry = self
            .resolver
            .catalog()
            .get(game)
            .ok_or_else(|| VfsError::InvalidArgument(game.to_string()))?;
        if entry.has_disk_images() {
            Ok(())
        } else {
            Err(VfsError::NotFound(path.to_string()))
        }
    }

    fn file_path(&self, path: &str) -> Result<PathBuf, VfsError> {
        match parse_path(path) {
            VfsPath::Root | VfsPath::GameDir { .. } => {
                Err(VfsError::IsADirectory(path.to_string()))
            }
            VfsPath::Other => Err(VfsError::NotFound(path.to_string())),
            file => self.backing_file(path, &file),
        }
    }

    fn backing_file(&self, path: &str, node: &VfsPath) -> Result<PathBuf, VfsError> {
        let (game, disk) = match node {
            VfsPath::Archive { game } => (game, None),
            VfsPath::DiskImage { game, disk } => (game, Some(disk)),
            _ => return Err(VfsError::NotFound(path.to_string())),
        };

        let archive = match self.resolver.resolve(game) {
            Ok(Resolution::Resolved { archive_path }) => archive_path,
            Ok(Resolution::NotFound) => return Err(VfsError::NotFound(path.to_string())),
            Err(e) => return Err(resolve_error(path, e)),
        };

        let found = match disk {
            None => archive,
            Some(disk) => self.resolver.disk_image_path(game, disk),
        };
        found.ok_or_else(|| VfsError::NotFound(path.to_string()))
    }
}

fn resolve_error(path: &str, e: ResolveError) -> VfsError {
    match e {
        ResolveError::UnknownGame(game) => VfsError::InvalidArgument(game),
        other => VfsError::io(path, other),
    }
}

#[cfg(test)]
#[path = "tests/vfs_tests.rs"]
mod tests;
