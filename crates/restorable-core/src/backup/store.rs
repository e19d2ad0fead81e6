//! The backup store.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::error;
use tracing::warn;

use super::report::RestoreFailure;
use super::report::RestoreReport;
use super::transfer::move_path;
use super::transfer::occupied;
use super::transfer::remove_path;
use crate::BackupConfig;
use crate::ExtractionError;
use crate::Result;

/// Suffix appended to a file name for its in-place backup.
pub const IN_PLACE_SUFFIX: &str = ".rbak";

/// A single reversible overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Absolute path the content was moved away from.
    pub original: PathBuf,
    /// Absolute path the content now lives at.
    pub backup: PathBuf,
    /// `true` for a same-directory rename, `false` for the external root.
    pub in_place: bool,
}

/// Records overwrites within one transaction so they can be undone.
///
/// Create one store per install or extract transaction and finish it with
/// either [`discard`](Self::discard) or [`restore`](Self::restore). Both leave
/// the store empty and reusable.
///
/// # Examples
///
/// ```no_run
/// use restorable_core::BackupConfig;
/// use restorable_core::BackupStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = BackupStore::new(BackupConfig::default());
///
/// if store.backup("/opt/app/plugins/core.jar")? {
///     std::fs::write("/opt/app/plugins/core.jar", b"new version")?;
/// }
///
/// let install_failed = true;
/// if install_failed {
///     store.restore().into_result()?;
/// } else {
///     store.discard()?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BackupStore {
    config: BackupConfig,
    records: Vec<BackupRecord>,
    originals: HashSet<PathBuf>,
    external_root: Option<PathBuf>,
}

impl Default for BackupStore {
    fn default() -> Self {
        Self::new(BackupConfig::default())
    }
}

impl BackupStore {
    /// Creates an empty store. No directory is created until the first
    /// external backup.
    #[must_use]
    pub fn new(config: BackupConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            originals: HashSet::new(),
            external_root: None,
        }
    }

    /// Moves the content at `path` aside so the caller can write there.
    ///
    /// Returns `Ok(false)` if nothing exists at `path`. Returns `Ok(true)` when
    /// `path` is now free: either its content was backed up, or it was already
    /// backed up earlier in this transaction, in which case the current content
    /// is this transaction's own output and is simply removed. If `path` holds
    /// an in-place backup, that backup moves to the external root first.
    ///
    /// On error nothing was recorded and `path` is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Backup`] if the content could not be moved.
    pub fn backup(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();
        let original = std::path::absolute(path).map_err(|source| ExtractionError::Backup {
            path: path.to_path_buf(),
            source,
        })?;
        let backup_error = |source| ExtractionError::Backup {
            path: original.clone(),
            source,
        };

        match fs::symlink_metadata(&original) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(backup_error(e)),
        }

        if self.originals.contains(&original) {
            remove_path(&original).map_err(backup_error)?;
            debug!(path = ?original, "removed content written earlier in this transaction");
            return Ok(true);
        }

        if let Some(index) = self.records.iter().position(|r| r.backup == original) {
            if !self.records[index].in_place {
                return Err(backup_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path holds a backup of this transaction",
                )));
            }
            let owner = self.records[index].original.clone();
            let target = self.external_path(&owner).map_err(backup_error)?;
            if occupied(&target) {
                return Err(backup_error(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("backup target already exists: {}", target.display()),
                )));
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(backup_error)?;
            }
            move_path(&original, &target).map_err(backup_error)?;

            debug!(path = ?owner, backup = ?target, "moved in-place backup to external root");
            let record = &mut self.records[index];
            record.backup = target;
            record.in_place = false;
            return Ok(true);
        }

        if let Some(sibling) = in_place_path(&original) {
            if occupied(&sibling) {
                debug!(path = ?original, sibling = ?sibling, "in-place backup name taken");
            } else {
                match fs::rename(&original, &sibling) {
                    Ok(()) => {
                        debug!(path = ?original, backup = ?sibling, "backed up in place");
                        self.push(BackupRecord {
                            original,
                            backup: sibling,
                            in_place: true,
                        });
                        return Ok(true);
                    }
                    Err(e) => {
                        debug!(path = ?original, error = %e, "in-place rename failed");
                    }
                }
            }
        }

        let target = self.external_path(&original).map_err(backup_error)?;
        if occupied(&target) {
            return Err(backup_error(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("backup target already exists: {}", target.display()),
            )));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(backup_error)?;
        }
        move_path(&original, &target).map_err(backup_error)?;

        debug!(path = ?original, backup = ?target, "backed up to external root");
        self.push(BackupRecord {
            original,
            backup: target,
            in_place: false,
        });
        Ok(true)
    }

    /// Moves every backup back, newest first.
    ///
    /// Whatever occupies an original path is removed first and missing parent
    /// directories are recreated. Failures are logged and collected; the
    /// remaining records are still restored. The external root is removed only
    /// if every record was restored.
    pub fn restore(&mut self) -> RestoreReport {
        let mut report = RestoreReport::default();

        for record in self.records.drain(..).rev() {
            match restore_record(&record) {
                Ok(()) => {
                    debug!(path = ?record.original, "restored");
                    report.restored.push(record.original);
                }
                Err(e) => {
                    error!(
                        original = ?record.original,
                        backup = ?record.backup,
                        error = %e,
                        "failed to restore backup"
                    );
                    report.failures.push(RestoreFailure {
                        original: record.original,
                        backup: record.backup,
                        message: e.to_string(),
                    });
                }
            }
        }
        self.originals.clear();

        if let Some(root) = self.external_root.take() {
            if report.is_complete() {
                if let Err(e) = fs::remove_dir_all(&root) {
                    warn!(root = ?root, error = %e, "failed to remove external backup root");
                }
            } else {
                warn!(root = ?root, "keeping external backup root, restore incomplete");
                report.retained_root = Some(root);
            }
        }

        report
    }

    /// Deletes every backup and the external root, keeping the new content.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::DiscardIncomplete`] listing the backups that
    /// remain on disk. The store is empty either way.
    pub fn discard(&mut self) -> Result<()> {
        let mut failed = Vec::new();

        for record in self.records.drain(..) {
            match remove_path(&record.backup) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(backup = ?record.backup, error = %e, "failed to delete backup");
                    failed.push(record.backup);
                }
            }
        }
        self.originals.clear();

        if let Some(root) = self.external_root.take() {
            match fs::remove_dir_all(&root) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(root = ?root, error = %e, "failed to delete external backup root");
                    failed.push(root);
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(ExtractionError::DiscardIncomplete { failed })
        }
    }

    /// Returns the records in creation order.
    #[must_use]
    pub fn records(&self) -> &[BackupRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been backed up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the external backup directory, if one was created.
    #[must_use]
    pub fn external_root(&self) -> Option<&Path> {
        self.external_root.as_deref()
    }

    /// Returns the sibling name an in-place backup of `path` would use.
    #[must_use]
    pub fn in_place_backup_path(path: &Path) -> Option<PathBuf> {
        in_place_path(path)
    }

    /// Returns `true` if `path` has been backed up in this transaction.
    #[must_use]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        std::path::absolute(path.as_ref()).is_ok_and(|p| self.originals.contains(&p))
    }

    fn push(&mut self, record: BackupRecord) {
        self.originals.insert(record.original.clone());
        self.records.push(record);
    }

    fn external_path(&mut self, original: &Path) -> io::Result<PathBuf> {
        let root = match &self.external_root {
            Some(root) => root.clone(),
            None => {
                let parent = self.config.root_parent();
                fs::create_dir_all(&parent)?;
                let root = tempfile::Builder::new()
                    .prefix(&self.config.prefix)
                    .suffix(&self.config.suffix)
                    .tempdir_in(&parent)?
                    .keep();
                debug!(root = ?root, "created external backup root");
                self.external_root = Some(root.clone());
                root
            }
        };

        let mut target = root;
        for component in original.components() {
            if let Component::Normal(part) = component {
                target.push(part);
            }
        }
        Ok(target)
    }
}

impl Drop for BackupStore {
    fn drop(&mut self) {
        if !self.records.is_empty() {
            warn!(
                records = self.records.len(),
                "backup store dropped without restore or discard, backups left on disk"
            );
        }
    }
}

fn in_place_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let mut sibling = OsString::from(name);
    sibling.push(IN_PLACE_SUFFIX);
    Some(path.with_file_name(sibling))
}

fn restore_record(record: &BackupRecord) -> io::Result<()> {
    if occupied(&record.original) {
        remove_path(&record.original)?;
    }
    if let Some(parent) = record.original.parent() {
        fs::create_dir_all(parent)?;
    }
    move_path(&record.backup, &record.original)
}
