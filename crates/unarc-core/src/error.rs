//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractError`.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while decompressing, opening, or materializing an
/// archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Destination path exists but is not a directory.
    #[error("destination exists and is not a directory: {path}")]
    NotADirectory {
        /// The offending destination path.
        path: PathBuf,
    },

    /// Destination path does not exist and creation was not requested.
    #[error("destination directory does not exist: {path}")]
    DestinationMissing {
        /// The missing destination path.
        path: PathBuf,
    },

    /// Compressed stream is corrupted or truncated.
    #[error("{format} stream error: {reason}")]
    Codec {
        /// Name of the compression format.
        format: &'static str,
        /// Description of the decoding failure.
        reason: String,
    },

    /// Container is malformed or cannot be parsed.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Entry path would resolve outside the destination root.
    #[error("entry path escapes destination root: {path}")]
    PathEscape {
        /// The path that attempted to escape.
        path: PathBuf,
    },

    /// Symbolic link entry carries no target.
    #[error("unable to get destination path for symbolic link {path}")]
    LinkTargetMissing {
        /// Path of the corrupt link entry.
        path: PathBuf,
    },

    /// Writing an entry's content to disk failed.
    #[error("failed to write content of {path}: {source}")]
    ContentWrite {
        /// Path being written.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// Applying a platform-supported attribute failed.
    #[error("failed to set attributes on {path}: {source}")]
    AttributeWrite {
        /// Path whose attributes were being set.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },
}
