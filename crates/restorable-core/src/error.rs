//! Error types for extraction, backup and archive reading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while extracting, backing up or reading archives.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or not an archive at all.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Archive contains no entries.
    #[error("invalid archive: no entries found")]
    EmptyArchive,

    /// An entry requested from the archive no longer exists in it.
    #[error("entry not found in archive: {name}")]
    EntryNotFound {
        /// Name of the entry that was requested.
        name: String,
    },

    /// Entry resolves outside the destination directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The entry name that attempted traversal.
        path: PathBuf,
    },

    /// Moving an existing file out of the way failed; nothing was overwritten.
    #[error("failed to back up {path}: {source}")]
    Backup {
        /// The file that could not be backed up.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The destination is locked by the OS and cannot be opened for writing.
    #[error("destination is busy: {path}: {source}")]
    Busy {
        /// The destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Some backup records could not be moved back.
    #[error("restore incomplete, {} path(s) could not be restored: {}", .failed.len(), display_paths(.failed))]
    RestoreIncomplete {
        /// Original paths that were not restored.
        failed: Vec<PathBuf>,
    },

    /// Some backups could not be deleted.
    #[error("discard incomplete, {} backup(s) could not be removed: {}", .failed.len(), display_paths(.failed))]
    DiscardIncomplete {
        /// Backup paths that remain on disk.
        failed: Vec<PathBuf>,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The operation was cancelled at an entry boundary.
    #[error("operation cancelled")]
    Cancelled,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExtractionError {
    /// Returns `true` if this error signals adversarial or corrupted input
    /// trying to write outside the destination.
    ///
    /// # Examples
    ///
    /// ```
    /// use restorable_core::ExtractionError;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::PathTraversal {
    ///     path: PathBuf::from("../etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::EmptyArchive;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathTraversal { .. })
    }

    /// Returns `true` if the input is not a readable archive.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArchive(_) | Self::EmptyArchive | Self::EntryNotFound { .. }
        )
    }

    /// Returns `true` if extraction can continue past this error.
    ///
    /// Only a busy destination is downgraded to a per-entry warning; every
    /// other error aborts the whole operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use restorable_core::ExtractionError;
    /// use std::io;
    /// use std::path::PathBuf;
    ///
    /// let err = ExtractionError::Busy {
    ///     path: PathBuf::from("eclipse.exe"),
    ///     source: io::Error::from(io::ErrorKind::ResourceBusy),
    /// };
    /// assert!(err.is_recoverable());
    ///
    /// let err = ExtractionError::InvalidArchive("truncated".to_string());
    /// assert!(!err.is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Returns a context string for this error, if available.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::InvalidPattern { reason, .. } => Some(reason),
            Self::EntryNotFound { name } => Some(name),
            _ => None,
        }
    }
}
