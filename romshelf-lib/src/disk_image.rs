//! Reading the content digest embedded in a disk image (CHD) header.
//!
//! The header stores a big-endian version at a fixed offset; where the
//! SHA-1 of the image content lives depends on that version.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use romshelf_core::{FileRecord, Sha1Digest, parse_sha1};

use crate::error::ResolveError;

/// Extension of disk images on disk.
pub const DISK_IMAGE_EXTENSION: &str = "chd";

/// Byte offset of the header version field.
const VERSION_OFFSET: u64 = 12;

/// Header version → byte offset of the 20-byte content SHA-1.
const DIGEST_OFFSETS: &[(u32, u64)] = &[(3, 80), (4, 48), (5, 84)];

/// Errors from reading a disk image header.
#[derive(Debug, thiserror::Error)]
pub enum DiskImageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported header version {0}")]
    UnsupportedVersion(u32),

    #[error("Header too short")]
    Truncated,
}

/// Version and digest read from a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskHeader {
    pub version: u32,
    pub sha1: Sha1Digest,
}

/// Path of disk image `disk` for `game` inside `dir`: `<dir>/<game>/<disk>.chd`.
pub fn disk_image_file(dir: &Path, game: &str, disk: &str) -> PathBuf {
    dir.join(game)
        .join(format!("{disk}.{DISK_IMAGE_EXTENSION}"))
}

/// Digest offset for a header version, if the version is known.
pub fn digest_offset(version: u32) -> Option<u64> {
    DIGEST_OFFSETS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|(_, offset)| *offset)
}

/// Read the header version and embedded digest from a reader.
pub fn read_header<R: Read + Seek>(reader: &mut R) -> Result<DiskHeader, DiskImageError> {
    let mut version_bytes = [0u8; 4];
    reader.seek(SeekFrom::Start(VERSION_OFFSET))?;
    read_exact_or_truncated(reader, &mut version_bytes)?;
    let version = u32::from_be_bytes(version_bytes);

    let offset = digest_offset(version).ok_or(DiskImageError::UnsupportedVersion(version))?;
    let mut sha1 = [0u8; 20];
    reader.seek(SeekFrom::Start(offset))?;
    read_exact_or_truncated(reader, &mut sha1)?;

    Ok(DiskHeader { version, sha1 })
}

fn read_exact_or_truncated<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), DiskImageError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => DiskImageError::Truncated,
        _ => DiskImageError::Io(e),
    })
}

/// Read the embedded digest of the image at `path`. `Ok(None)` if there is no file.
pub fn read_digest(path: &Path) -> Result<Option<Sha1Digest>, DiskImageError> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    read_header(&mut file).map(|h| Some(h.sha1))
}

/// Check the image at `path` against `record`.
///
/// `Ok(None)` if the file does not exist, otherwise whether the embedded
/// digest equals the record's SHA-1.
pub fn verify_disk_image(path: &Path, record: &FileRecord) -> Result<Option<bool>, ResolveError> {
    let expected = parse_sha1(&record.expected_sha1)
        .map_err(|e| ResolveError::checksum(e, path, &record.name))?;
    let digest = read_digest(path).map_err(|e| ResolveError::disk_image(e, path))?;
    Ok(digest.map(|d| d == expected))
}

#[cfg(test)]
#[path = "tests/disk_image_tests.rs"]
mod tests;
