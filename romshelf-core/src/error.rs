use thiserror::Error;

/// Errors from checksum verification.
///
/// A checksum that simply does not match is not an error; see
/// [`VerifyOutcome`](crate::checksum::VerifyOutcome).
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// I/O error while reading the stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog's expected value is not valid hex
    #[error("Malformed {field} value {value:?}: {reason}")]
    Malformed {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ChecksumError {
    pub fn malformed(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
