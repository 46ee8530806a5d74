//! On-disk fixtures shared by the unit tests: ZIP sets and disk images.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use sha1::Digest;
use zip::write::SimpleFileOptions;

use romshelf_core::{FileRecord, Sha1Digest};

pub(crate) fn sha1_of(data: &[u8]) -> Sha1Digest {
    let mut out = [0u8; 20];
    out.copy_from_slice(&sha1::Sha1::digest(data));
    out
}

pub(crate) fn sha1_hex(data: &[u8]) -> String {
    hex::encode(sha1_of(data))
}

pub(crate) fn crc_hex(data: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(data))
}

/// An archive-member record that `data` satisfies.
pub(crate) fn record(name: &str, data: &[u8]) -> FileRecord {
    FileRecord::new(name, data.len() as u32, sha1_hex(data)).with_crc32(crc_hex(data))
}

/// A disk-image record that an image carrying `digest` satisfies.
pub(crate) fn disk_record(name: &str, digest: &Sha1Digest) -> FileRecord {
    FileRecord::disk(name, hex::encode(digest))
}

/// Write a ZIP archive holding `members`, creating parent directories.
pub(crate) fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, data) in members {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// Write a minimal disk image header of `version` with `digest` at the
/// version's digest offset.
pub(crate) fn write_disk_image(path: &Path, version: u32, offset: usize, digest: &Sha1Digest) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let len = (offset + 20).max(124);
    let mut header = vec![0u8; len];
    header[..8].copy_from_slice(b"MComprHD");
    header[8..12].copy_from_slice(&(len as u32).to_be_bytes());
    header[12..16].copy_from_slice(&version.to_be_bytes());
    header[offset..offset + 20].copy_from_slice(digest);
    fs::write(path, header).unwrap();
}
