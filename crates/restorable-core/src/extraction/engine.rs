//! ZIP extraction with filtering, containment checks and backups.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use std::time::SystemTime;

use tracing::debug;
use tracing::info;
use tracing::warn;

use super::stream::CopyBuffer;
use super::stream::copy_with_buffer;
use super::stream::is_busy;
use crate::BackupStore;
use crate::CancellationToken;
use crate::ExtractionConfig;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::filter::Filter;
use crate::filter::PatternSet;
use crate::formats::zip::map_zip_error;
use crate::formats::zip::open_archive;
use crate::formats::zip::to_system_time;
use crate::types::DestDir;
use crate::types::SafePath;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Extracts ZIP archives into a destination directory.
///
/// Entries are processed in central-directory order. For each one the
/// prefix is applied, then the include and exclude patterns, then the
/// resulting name is resolved against the destination. A name that escapes
/// the destination aborts the whole extraction before anything is written
/// for it.
///
/// # Examples
///
/// ```no_run
/// use restorable_core::BackupStore;
/// use restorable_core::DestDir;
/// use restorable_core::ExtractionConfig;
/// use restorable_core::ExtractionEngine;
/// use std::fs::File;
/// use std::io::BufReader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = ExtractionEngine::new(
///     ExtractionConfig::default()
///         .with_prefix(Some("plugins".to_string()))
///         .with_include(vec!["*.jar".to_string()]),
/// )?;
/// let dest = DestDir::new("/opt/app/plugins")?;
/// let mut store = BackupStore::default();
///
/// let archive = BufReader::new(File::open("update.zip")?);
/// match engine.extract(archive, &dest, Some(&mut store)) {
///     Ok(report) => {
///         println!("updated {} files", report.files_extracted);
///         store.discard()?;
///     }
///     Err(e) => {
///         eprintln!("update failed: {e}");
///         store.restore().into_result()?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    prefix: Option<String>,
    filter: Filter,
}

enum WriteOutcome {
    Written(u64),
    Busy(io::Error),
}

impl ExtractionEngine {
    /// Compiles the patterns of `config` into an engine.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidPattern` if a pattern does not compile.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let filter = Filter::new(
            PatternSet::new(&config.include)?,
            PatternSet::new(&config.exclude)?,
        );
        let prefix = config.effective_prefix().map(str::to_string);
        Ok(Self { prefix, filter })
    }

    /// Extracts every selected entry of `archive` into `dest`.
    ///
    /// When `backup` is given, each existing destination is handed to the
    /// store before it is overwritten; otherwise it is deleted.
    ///
    /// # Errors
    ///
    /// - `ExtractionError::EmptyArchive` if the archive has no entries
    /// - `ExtractionError::InvalidArchive` if the archive is unreadable
    /// - `ExtractionError::PathTraversal` if an entry escapes `dest`
    /// - `ExtractionError::Backup` if an existing file cannot be backed up
    /// - `ExtractionError::Io` for any other write failure
    ///
    /// A destination that is busy is not an error; it is recorded as a
    /// warning in the report and the entry is skipped.
    pub fn extract<R: Read + Seek>(
        &self,
        archive: R,
        dest: &DestDir,
        backup: Option<&mut BackupStore>,
    ) -> Result<ExtractionReport> {
        self.extract_with(archive, dest, backup, &mut NoopProgress, None)
    }

    /// Like [`extract`](Self::extract), with progress reporting and
    /// cancellation checked before each entry.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract), plus `ExtractionError::Cancelled`.
    pub fn extract_with<R: Read + Seek>(
        &self,
        archive: R,
        dest: &DestDir,
        mut backup: Option<&mut BackupStore>,
        progress: &mut dyn ProgressCallback,
        cancel: Option<&CancellationToken>,
    ) -> Result<ExtractionReport> {
        let start = Instant::now();
        let mut zip = open_archive(archive)?;
        let total = zip.len();
        if total == 0 {
            return Err(ExtractionError::EmptyArchive);
        }

        info!(
            destination = %dest.as_path().display(),
            entries = total,
            prefix = self.prefix.as_deref().unwrap_or(""),
            "extracting archive"
        );

        let mut report = ExtractionReport::new();
        let mut buffer = CopyBuffer::new();

        for index in 0..total {
            if let Some(token) = cancel {
                token.check()?;
            }

            let mut file = zip.by_index(index).map_err(map_zip_error)?;
            let raw_name = file.name().to_string();
            progress.on_entry_start(Path::new(&raw_name), total, index + 1);

            let is_dir = file.is_dir();
            let Some(name) = self.selected_name(&raw_name, is_dir) else {
                debug!(entry = %raw_name, "entry not selected");
                report.entries_skipped += 1;
                progress.on_entry_complete(Path::new(&raw_name));
                continue;
            };

            let safe = SafePath::resolve(name, dest)?;
            if safe.is_root() {
                if !is_dir {
                    debug!(entry = %raw_name, "file entry names the destination itself");
                    report.entries_skipped += 1;
                }
                progress.on_entry_complete(Path::new(&raw_name));
                continue;
            }
            let target = safe.into_path_buf();

            if is_dir {
                if !target.is_dir() {
                    fs::create_dir_all(&target)?;
                    report.directories_created += 1;
                }
            } else {
                let mtime = file.last_modified().and_then(to_system_time);
                let outcome = write_file(
                    &mut file,
                    &target,
                    mtime,
                    backup.as_deref_mut(),
                    &mut buffer,
                    progress,
                )?;
                match outcome {
                    WriteOutcome::Written(bytes) => {
                        report.files_extracted += 1;
                        report.bytes_written += bytes;
                    }
                    WriteOutcome::Busy(err) => {
                        warn!(path = %target.display(), error = %err, "destination is busy, skipped");
                        report.add_warning(&target, format!("destination is busy: {err}"));
                    }
                }
            }

            report.touched.push(target);
            progress.on_entry_complete(Path::new(&raw_name));
        }

        progress.on_complete();
        report.duration = start.elapsed();

        info!(
            files = report.files_extracted,
            directories = report.directories_created,
            skipped = report.entries_skipped,
            warnings = report.warnings.len(),
            "extraction finished"
        );
        Ok(report)
    }

    /// Applies the prefix and the patterns to an archive name. Returns the
    /// name relative to the destination, or `None` if the entry is dropped.
    fn selected_name<'a>(&self, raw: &'a str, is_dir: bool) -> Option<&'a str> {
        let name = match &self.prefix {
            Some(prefix) => {
                let rest = raw.strip_prefix(prefix.as_str())?.strip_prefix('/')?;
                if rest.is_empty() && !is_dir {
                    return None;
                }
                rest
            }
            None => raw,
        };

        let matched = name.strip_suffix('/').unwrap_or(name);
        if !matched.is_empty() && !self.filter.accepts(matched) {
            return None;
        }
        Some(name)
    }
}

fn write_file(
    reader: &mut dyn Read,
    target: &Path,
    mtime: Option<SystemTime>,
    backup: Option<&mut BackupStore>,
    buffer: &mut CopyBuffer,
    progress: &mut dyn ProgressCallback,
) -> Result<WriteOutcome> {
    if let Some(store) = backup {
        if store.backup(target)? {
            debug!(path = %target.display(), "existing destination backed up");
        }
    } else if let Err(err) = remove_existing(target) {
        if is_busy(&err) {
            return Ok(WriteOutcome::Busy(err));
        }
        return Err(err.into());
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = match create_destination(target) {
        Ok(file) => file,
        Err(err) if is_busy(&err) => return Ok(WriteOutcome::Busy(err)),
        Err(err) => return Err(err.into()),
    };

    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    let bytes = copy_with_buffer(reader, &mut writer, buffer, progress)?;
    writer.flush()?;

    if let Some(mtime) = mtime {
        let file = writer.get_ref();
        if let Err(err) = file.set_modified(mtime) {
            debug!(path = %target.display(), error = %err, "could not set modification time");
        }
    }

    Ok(WriteOutcome::Written(bytes))
}

fn create_destination(target: &Path) -> io::Result<File> {
    if let Some(err) = simulated_lock(target) {
        return Err(err);
    }
    File::create(target)
}

#[cfg(test)]
thread_local! {
    static LOCKED: std::cell::RefCell<Vec<(std::path::PathBuf, io::ErrorKind)>> =
        const { std::cell::RefCell::new(Vec::new()) };
}

/// Makes creating any destination ending in `path` on this thread fail with `kind`.
#[cfg(test)]
fn lock_for_test(path: &Path, kind: io::ErrorKind) {
    LOCKED.with_borrow_mut(|locked| locked.push((path.to_path_buf(), kind)));
}

#[cfg(test)]
fn simulated_lock(target: &Path) -> Option<io::Error> {
    LOCKED.with_borrow(|locked| {
        locked
            .iter()
            .find(|(path, _)| target.ends_with(path))
            .map(|(_, kind)| io::Error::new(*kind, "held by another process"))
    })
}

#[cfg(not(test))]
const fn simulated_lock(_target: &Path) -> Option<io::Error> {
    None
}

/// Deletes a file or symlink at `path`. A directory is left alone and
/// reported, since there is no store to restore it from.
fn remove_existing(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} is a directory", path.display()),
        )),
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
