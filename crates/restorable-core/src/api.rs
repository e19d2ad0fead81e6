//! High-level entry points.

use std::path::Path;

use crate::BackupStore;
use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ExtractionRequest;
use crate::Result;
use crate::formats::ArchiveType;
use crate::formats::detect_format;

/// Extracts the ZIP archive at `archive_path` into `output_dir`.
///
/// Overwritten files are handed to `backup` when one is given. The caller
/// decides afterwards whether to [`discard`](BackupStore::discard) or
/// [`restore`](BackupStore::restore) them.
///
/// # Errors
///
/// Returns an error if:
/// - the archive cannot be opened or is not a ZIP archive
/// - an entry resolves outside `output_dir`
/// - an existing file cannot be backed up
/// - I/O operations fail
///
/// # Examples
///
/// ```no_run
/// use restorable_core::BackupStore;
/// use restorable_core::ExtractionConfig;
/// use restorable_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = BackupStore::default();
/// let config = ExtractionConfig::default();
/// match extract_archive("update.zip", "/opt/app", &config, Some(&mut store)) {
///     Ok(report) => {
///         println!("Extracted {} files", report.files_extracted);
///         store.discard()?;
///     }
///     Err(e) => {
///         store.restore().into_result()?;
///         return Err(e.into());
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &ExtractionConfig,
    backup: Option<&mut BackupStore>,
) -> Result<ExtractionReport> {
    let archive_path = archive_path.as_ref();
    let format = detect_format(archive_path)?;
    if format != ArchiveType::Zip {
        return Err(ExtractionError::InvalidArchive(format!(
            "{} archives can be listed but not extracted",
            format.name()
        )));
    }

    let request = ExtractionRequest::from_path(archive_path, output_dir.as_ref())
        .config(config.clone());
    match backup {
        Some(store) => request.backup(store).extract(),
        None => request.extract(),
    }
}
