use std::path::{Path, PathBuf};

use thiserror::Error;

use romshelf_core::ChecksumError;

use crate::disk_image::DiskImageError;

/// Errors that abort a resolution.
///
/// Verification mismatches and missing files are never errors; they end in
/// [`Resolution::NotFound`](crate::resolver::Resolution::NotFound).
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The requested name is not in the catalog
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    /// A `cloneof`/`romof` reference points at a name the catalog lacks
    #[error("{game}: parent '{parent}' is not in the catalog")]
    MissingParent { game: String, parent: String },

    /// The parent graph loops back on itself
    #[error("Cyclic ancestry: {}", chain.join(" -> "))]
    CyclicAncestry { chain: Vec<String> },

    /// A file exists but could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An archive exists but is not a readable ZIP file
    #[error("Could not read archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// The catalog's expected checksum for a file is not valid hex
    #[error("Bad expected checksum for '{file}' (checking {}): {source}", path.display())]
    MalformedChecksum {
        path: PathBuf,
        file: String,
        #[source]
        source: ChecksumError,
    },

    /// Disk image header carries a version with no known digest offset
    #[error("Unsupported disk image version {version} in {}", path.display())]
    UnsupportedDiskVersion { path: PathBuf, version: u32 },

    /// Disk image header ended before the digest
    #[error("Truncated disk image header in {}", path.display())]
    TruncatedDiskImage { path: PathBuf },
}

impl ResolveError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn archive(path: &Path, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attach context to a checksum failure on `file`, read from `path`.
    pub fn checksum(source: ChecksumError, path: &Path, file: &str) -> Self {
        match source {
            ChecksumError::Io(e) => Self::io(path, e),
            malformed => Self::MalformedChecksum {
                path: path.to_path_buf(),
                file: file.to_string(),
                source: malformed,
            },
        }
    }

    pub fn disk_image(source: DiskImageError, path: &Path) -> Self {
        match source {
            DiskImageError::Io(e) => Self::io(path, e),
            DiskImageError::UnsupportedVersion(version) => Self::UnsupportedDiskVersion {
                path: path.to_path_buf(),
                version,
            },
            DiskImageError::Truncated => Self::TruncatedDiskImage {
                path: path.to_path_buf(),
            },
        }
    }

    /// Whether the catalog data itself is at fault (not the files on disk).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MalformedChecksum { .. } | Self::UnsupportedDiskVersion { .. }
        )
    }
}
