//! Matching the members of one ZIP archive against expected file records.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use romshelf_core::{ExpectedChecksums, FileRecord, MismatchKind, VerifyOutcome, parse_crc32};

use crate::error::ResolveError;

/// Extension of set archives on disk.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Path of `game`'s own archive inside `dir`.
pub fn archive_path(dir: &Path, game: &str) -> PathBuf {
    dir.join(format!("{game}.{ARCHIVE_EXTENSION}"))
}

/// How members absent from the requirement map are treated.
#[derive(Debug, Clone, Copy)]
pub enum ExtraMembers<'a> {
    /// Any extra member rejects the archive
    Reject,
    /// Extra members are skipped unread
    Allow,
    /// Only these names are skipped; any other extra member rejects
    Skip(&'a BTreeSet<String>),
}

impl ExtraMembers<'_> {
    fn tolerates(&self, name: &str) -> bool {
        match self {
            Self::Reject => false,
            Self::Allow => true,
            Self::Skip(names) => names.contains(name),
        }
    }
}

/// Why an archive was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRejection {
    /// The archive holds a member nobody asked for
    Unexpected,
    /// A required member failed a size, CRC or SHA-1 check
    Checksum(MismatchKind),
}

impl std::fmt::Display for MemberRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unexpected => write!(f, "unexpected member"),
            Self::Checksum(kind) => write!(f, "{} mismatch", kind.name()),
        }
    }
}

/// Result of one archive pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// No file at the path
    NotFound,
    /// The archive was rejected at `member`; the requirement map is unchanged
    Mismatch {
        member: String,
        reason: MemberRejection,
    },
    /// Every required member present verified; those names were removed
    Matched {
        matched: Vec<String>,
        /// Whether the requirement map is now empty
        complete: bool,
    },
}

/// Check the archive at `path` against `required`.
///
/// Every member physically present is examined. A member whose name is not
/// in `required` rejects the archive unless `extra` tolerates it.
/// Required members must match size exactly, then CRC-32 and SHA-1. The pass
/// stops at the first rejection. Only a clean pass removes matched names
/// from `required`.
pub fn match_archive(
    path: &Path,
    required: &mut BTreeMap<String, FileRecord>,
    extra: ExtraMembers<'_>,
) -> Result<ArchiveOutcome, ResolveError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ArchiveOutcome::NotFound),
        Err(e) => return Err(ResolveError::io(path, e)),
    };
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| ResolveError::archive(path, e))?;

    let mut matched = Vec::new();

    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .map_err(|e| ResolveError::archive(path, e))?;
        if member.is_dir() {
            continue;
        }
        let name = member.name().to_string();

        let Some(record) = required.get(&name) else {
            if extra.tolerates(&name) {
                continue;
            }
            return Ok(rejected(name, MemberRejection::Unexpected));
        };

        // Central directory values first
        let expected_size = u64::from(record.expected_size);
        if member.size() != expected_size {
            return Ok(rejected(name, MemberRejection::Checksum(MismatchKind::Size)));
        }
        let expected_crc = parse_crc32(record.expected_crc32.as_deref().unwrap_or(""))
            .map_err(|e| ResolveError::checksum(e, path, &name))?;
        if expected_crc.is_some_and(|crc| crc != member.crc32()) {
            return Ok(rejected(name, MemberRejection::Checksum(MismatchKind::Crc32)));
        }

        let expected = ExpectedChecksums {
            sha1: &record.expected_sha1,
            crc32: record.expected_crc32.as_deref(),
            size: Some(expected_size),
        };
        let outcome = romshelf_core::verify(&mut member, &expected)
            .map_err(|e| ResolveError::checksum(e, path, &name))?;
        if let VerifyOutcome::Mismatch(kind) = outcome {
            return Ok(rejected(name, MemberRejection::Checksum(kind)));
        }

        matched.push(name);
    }

    for name in &matched {
        required.remove(name);
    }

    Ok(ArchiveOutcome::Matched {
        matched,
        complete: required.is_empty(),
    })
}

fn rejected(member: String, reason: MemberRejection) -> ArchiveOutcome {
    ArchiveOutcome::Mismatch { member, reason }
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
