/// Dump status of an expected file, as recorded in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DumpStatus {
    /// The file is expected to exist and verify
    #[default]
    Normal,
    /// The file has never been dumped; it is never required to be present
    NoDump,
}

impl DumpStatus {
    /// Map a catalog `status` attribute to a dump status.
    ///
    /// Only `nodump` is special. `baddump`, `good` and anything unknown are
    /// still checked like any other file.
    pub fn from_attr(value: &str) -> Self {
        if value.eq_ignore_ascii_case("nodump") {
            Self::NoDump
        } else {
            Self::Normal
        }
    }

    pub fn is_nodump(self) -> bool {
        self == Self::NoDump
    }
}

/// One expected file: an archive member or a disk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Member or image name, trimmed of surrounding whitespace
    pub name: String,
    /// Uncompressed size in bytes (archive members only; 0 for disk images)
    pub expected_size: u32,
    /// CRC-32 as hex; `None` or empty means "do not check"
    pub expected_crc32: Option<String>,
    /// SHA-1 as hex (40 digits)
    pub expected_sha1: String,
    pub status: DumpStatus,
}

impl FileRecord {
    /// Create a record, trimming the name.
    ///
    /// Some catalogs ship names with stray trailing spaces (`"dc0.c6 "`);
    /// both ends are trimmed so they line up with archive member names.
    pub fn new(name: &str, expected_size: u32, expected_sha1: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            expected_size,
            expected_crc32: None,
            expected_sha1: expected_sha1.into(),
            status: DumpStatus::Normal,
        }
    }

    /// Create a disk-image record (no size, no CRC).
    pub fn disk(name: &str, expected_sha1: impl Into<String>) -> Self {
        Self::new(name, 0, expected_sha1)
    }

    pub fn with_crc32(mut self, crc: impl Into<String>) -> Self {
        let crc = crc.into();
        self.expected_crc32 = if crc.is_empty() { None } else { Some(crc) };
        self
    }

    pub fn with_status(mut self, status: DumpStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether this record must physically exist for its entry to resolve.
    pub fn is_required(&self) -> bool {
        !self.status.is_nodump()
    }
}
