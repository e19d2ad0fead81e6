//! Error conversion utilities for CLI.
//!
//! Converts restorable-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use restorable_core::ExtractionError;
use restorable_core::RestoreReport;
use std::path::Path;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive '{}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                path.display()
            )
        }
        ExtractionError::Backup { path, source } => {
            anyhow!(
                "Could not back up '{}' before overwriting it: {}\n\
                 HINT: Check permissions, or pass --backup-dir to keep backups on another volume.",
                path.display(),
                source
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
        ExtractionError::EmptyArchive => {
            anyhow!("Archive '{}' contains no entries", archive.display())
        }
        ExtractionError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be corrupted or malformed.",
                archive.display(),
                reason
            )
        }
        ExtractionError::EntryNotFound { name } => {
            anyhow!(
                "Entry '{}' not found in '{}'\n\
                 HINT: Use `restorable list` to see the entry names.",
                name,
                archive.display()
            )
        }
        ExtractionError::InvalidPattern { pattern, reason } => {
            anyhow!("Invalid pattern '{pattern}': {reason}")
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}

/// Appends the rollback outcome to an extraction error.
pub fn with_restore_outcome(err: anyhow::Error, restore: &RestoreReport) -> anyhow::Error {
    if restore.is_complete() {
        return err.context(format!(
            "Extraction failed, {} overwritten file(s) were restored",
            restore.restored.len()
        ));
    }

    let mut lines: Vec<String> = restore
        .failures
        .iter()
        .map(|f| {
            format!(
                "  {} (backup kept at {}): {}",
                f.original.display(),
                f.backup.display(),
                f.message
            )
        })
        .collect();
    lines.insert(
        0,
        format!(
            "Extraction failed and {} file(s) could not be restored:",
            restore.failures.len()
        ),
    );
    if let Some(root) = &restore.retained_root {
        lines.push(format!("HINT: Remaining backups are in '{}'.", root.display()));
    }
    err.context(lines.join("\n"))
}
