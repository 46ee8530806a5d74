use std::process::ExitCode;

use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catalog or directory list could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Requested game is not in the catalog
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// A virtual filesystem operation failed
    #[error("{path}: {message} (errno {errno})")]
    Vfs {
        path: String,
        errno: i32,
        message: String,
    },
}

impl CliError {
    pub(crate) fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub(crate) fn unknown_game(name: impl Into<String>) -> Self {
        Self::UnknownGame(name.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn vfs(path: &str, err: &romshelf_lib::VfsError) -> Self {
        Self::Vfs {
            path: path.to_string(),
            errno: err.errno(),
            message: err.to_string(),
        }
    }

    /// Process exit status for this error.
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::UnknownGame(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}
