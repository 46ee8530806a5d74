//! Streaming SHA-1 / CRC-32 verification against catalog values.

use std::io::Read;

use sha1::Digest;

use crate::error::ChecksumError;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Raw 20-byte SHA-1 digest.
pub type Sha1Digest = [u8; 20];

/// Which sub-check rejected a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    Size,
    Crc32,
    Sha1,
}

impl MismatchKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Crc32 => "CRC-32",
            Self::Sha1 => "SHA-1",
        }
    }
}

/// Result of verifying a stream. A mismatch is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Match,
    Mismatch(MismatchKind),
}

impl VerifyOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Expected values for one stream, borrowed from the catalog record.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedChecksums<'a> {
    /// SHA-1 as hex
    pub sha1: &'a str,
    /// CRC-32 as hex; `None` or empty skips the CRC check
    pub crc32: Option<&'a str>,
    /// Exact byte count, if known
    pub size: Option<u64>,
}

/// Hashes computed over a full stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHashes {
    pub crc32: u32,
    pub sha1: Sha1Digest,
    pub bytes_read: u64,
}

/// Decode a hex SHA-1 into raw bytes.
///
/// Anything other than exactly 40 hex digits is a malformed catalog value.
pub fn parse_sha1(value: &str) -> Result<Sha1Digest, ChecksumError> {
    let mut out = [0u8; 20];
    hex::decode_to_slice(value.trim(), &mut out)
        .map_err(|e| ChecksumError::malformed("sha1", value, e.to_string()))?;
    Ok(out)
}

/// Parse a hex CRC-32 (case-insensitive). Empty means "do not check".
pub fn parse_crc32(value: &str) -> Result<Option<u32>, ChecksumError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.len() > 8 {
        return Err(ChecksumError::malformed("crc", value, "more than 8 hex digits"));
    }
    if !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChecksumError::malformed("crc", value, "not a hex number"));
    }
    u32::from_str_radix(value, 16)
        .map(Some)
        .map_err(|e| ChecksumError::malformed("crc", value, e.to_string()))
}

/// Compute CRC-32 and SHA-1 of a stream, reading it to the end in 64KB chunks.
pub fn compute_hashes<R: Read + ?Sized>(reader: &mut R) -> Result<StreamHashes, ChecksumError> {
    let mut crc = crc32fast::Hasher::new();
    let mut sha = sha1::Sha1::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut bytes_read: u64 = 0;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        crc.update(&buf[..n]);
        sha.update(&buf[..n]);
        bytes_read += n as u64;
    }

    let mut sha1 = [0u8; 20];
    sha1.copy_from_slice(&sha.finalize());

    Ok(StreamHashes {
        crc32: crc.finalize(),
        sha1,
        bytes_read,
    })
}

/// Verify a stream against expected checksums.
///
/// The expected values are decoded before any bytes are read, so a corrupt
/// catalog value is reported even when the stream would not have matched.
/// Sub-checks are applied in order size, CRC-32, SHA-1; the first failing
/// one is reported.
pub fn verify<R: Read + ?Sized>(
    reader: &mut R,
    expected: &ExpectedChecksums<'_>,
) -> Result<VerifyOutcome, ChecksumError> {
    let want_sha1 = parse_sha1(expected.sha1)?;
    let want_crc = match expected.crc32 {
        Some(crc) => parse_crc32(crc)?,
        None => None,
    };

    let hashes = compute_hashes(reader)?;

    if let Some(size) = expected.size {
        if hashes.bytes_read != size {
            return Ok(VerifyOutcome::Mismatch(MismatchKind::Size));
        }
    }
    if let Some(crc) = want_crc {
        if crc != hashes.crc32 {
            return Ok(VerifyOutcome::Mismatch(MismatchKind::Crc32));
        }
    }
    if want_sha1 != hashes.sha1 {
        return Ok(VerifyOutcome::Mismatch(MismatchKind::Sha1));
    }
    Ok(VerifyOutcome::Match)
}

/// Format a digest as lowercase hex.
pub fn digest_hex(digest: &Sha1Digest) -> String {
    hex::encode(digest)
}

#[cfg(test)]
#[path = "tests/checksum_tests.rs"]
mod tests;
