//! Error types for the mime writer crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the mime writer crate.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error on the sink (transport closed, stream error, short write).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A file attachment does not exist at the given path.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// The offending attachment path.
        path: PathBuf,
    },

    /// A file attachment exists but could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        /// The offending attachment path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Multipart error
    #[error("Multipart error: {0}")]
    Multipart(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classifies a failure to open or read a file attachment.
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound { path }
        } else {
            Error::FileRead { path, source }
        }
    }
}

/// Specialized Result type for mime writer operations.
pub type Result<T> = std::result::Result<T, Error>;
