//! Outcome of a restore.

use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// A backup record that could not be moved back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure {
    /// Path the content should have been restored to.
    pub original: PathBuf,
    /// Where the backed-up content still lives.
    pub backup: PathBuf,
    /// Description of the I/O failure.
    pub message: String,
}

/// Per-record result of [`BackupStore::restore`](super::BackupStore::restore).
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// Original paths restored, in the order they were restored.
    pub restored: Vec<PathBuf>,
    /// Records that failed to restore.
    pub failures: Vec<RestoreFailure>,
    /// External backup directory left on disk because of failures.
    pub retained_root: Option<PathBuf>,
}

impl RestoreReport {
    /// Returns `true` if every record was restored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts failures into [`ExtractionError::RestoreIncomplete`].
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(ExtractionError::RestoreIncomplete {
            failed: self.failures.into_iter().map(|f| f.original).collect(),
        })
    }
}
