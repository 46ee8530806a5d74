//! Shared types for romshelf: catalog file records and checksum verification.

pub mod checksum;
pub mod error;
pub mod record;
pub mod util;

pub use checksum::{
    ExpectedChecksums, MismatchKind, Sha1Digest, StreamHashes, VerifyOutcome, compute_hashes,
    parse_crc32, parse_sha1, verify,
};
pub use error::ChecksumError;
pub use record::{DumpStatus, FileRecord};
