//! Error types for pcurate-core.

use std::path::PathBuf;

use miette::Diagnostic;
use pcurate_config::error::ConfigError;
use pcurate_db::error::DbError;
use thiserror::Error;

/// Core error type for pcurate operations.
#[derive(Error, Diagnostic, Debug)]
pub enum PcurateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Annotation store at {} is unavailable", path.display())]
    #[diagnostic(
        code(pcurate::storage_unavailable),
        help("Check that the file is readable and is a pcurate database")
    )]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: DbError,
    },

    #[error("Database operation failed: {0}")]
    #[diagnostic(code(pcurate::database))]
    DatabaseError(String),

    #[error("Failed to list installed packages: {0}")]
    #[diagnostic(
        code(pcurate::listing_unavailable),
        help("Make sure pacman is installed and runs without errors")
    )]
    ListingUnavailable(String),

    #[error("Error while {action}")]
    #[diagnostic(code(pcurate::io), help("Check file permissions"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<diesel::result::Error> for PcurateError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, PcurateError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, PcurateError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            PcurateError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
