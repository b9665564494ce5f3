//! Error taxonomy for the record store. The presentation layers turn these into
//! status lines or exit messages; the store itself never swallows them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading, mutating or persisting a
/// library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Input handed to `add` could not be turned into a book record.
    #[error("{0}")]
    Validation(String),

    /// A search was requested against a field other than `title` or `author`.
    #[error("cannot search by `{0}`; expected `title` or `author`")]
    InvalidField(String),

    /// The library file exists but does not hold a JSON array of books.
    #[error("library file {} is corrupt", path.display())]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The library file could not be read or written.
    #[error("failed to {action} library file {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LibraryError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LibraryError::Validation(message.into())
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LibraryError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = LibraryError> = std::result::Result<T, E>;
