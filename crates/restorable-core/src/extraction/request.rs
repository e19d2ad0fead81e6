//! Builder bundling the inputs of one extraction.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::PathBuf;

use super::engine::ExtractionEngine;
use crate::BackupStore;
use crate::CancellationToken;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::types::DestDir;

trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

enum Source<'a> {
    Path(PathBuf),
    Reader(Box<dyn ReadSeek + 'a>),
}

/// One extraction: source archive, destination, selection and backup.
///
/// # Examples
///
/// ```no_run
/// use restorable_core::BackupStore;
/// use restorable_core::ExtractionRequest;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = BackupStore::default();
/// let report = ExtractionRequest::from_path("update.zip", "/opt/app")
///     .prefix("app")
///     .include(["*.jar", "*.xml"])
///     .exclude(["*.source.jar"])
///     .backup(&mut store)
///     .extract();
///
/// match report {
///     Ok(_) => store.discard()?,
///     Err(_) => store.restore().into_result()?,
/// }
/// # Ok(())
/// # }
/// ```
pub struct ExtractionRequest<'a> {
    source: Source<'a>,
    destination: PathBuf,
    config: ExtractionConfig,
    backup: Option<&'a mut BackupStore>,
    progress: Option<&'a mut dyn ProgressCallback>,
    cancel: Option<CancellationToken>,
}

impl<'a> ExtractionRequest<'a> {
    /// Extracts the ZIP file at `archive` into `destination`.
    #[must_use]
    pub fn from_path(archive: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::Path(archive.into()), destination.into())
    }

    /// Extracts ZIP data read from `reader` into `destination`.
    #[must_use]
    pub fn from_reader<R: Read + Seek + 'a>(reader: R, destination: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::Reader(Box::new(reader)), destination.into())
    }

    fn with_source(source: Source<'a>, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            config: ExtractionConfig::default(),
            backup: None,
            progress: None,
            cancel: None,
        }
    }

    /// Uses `prefix` inside the archive as extraction root.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    /// Adds include patterns.
    #[must_use]
    pub fn include<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds exclude patterns.
    #[must_use]
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Replaces prefix and patterns with `config`.
    #[must_use]
    pub fn config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Backs up every overwritten destination into `store`.
    #[must_use]
    pub fn backup(mut self, store: &'a mut BackupStore) -> Self {
        self.backup = Some(store);
        self
    }

    /// Reports progress to `progress`.
    #[must_use]
    pub fn progress(mut self, progress: &'a mut dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Stops before the next entry once `token` is cancelled.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs the extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination is not an existing directory, the
    /// archive cannot be opened, a pattern is invalid, or extraction fails as
    /// described on [`ExtractionEngine::extract`].
    pub fn extract(self) -> Result<ExtractionReport> {
        let engine = ExtractionEngine::new(self.config)?;
        let dest = DestDir::new(self.destination)?;

        let mut noop = NoopProgress;
        let progress: &mut dyn ProgressCallback = match self.progress {
            Some(progress) => progress,
            None => &mut noop,
        };

        match self.source {
            Source::Path(path) => {
                let reader = BufReader::new(File::open(path)?);
                engine.extract_with(reader, &dest, self.backup, progress, self.cancel.as_ref())
            }
            Source::Reader(reader) => {
                engine.extract_with(reader, &dest, self.backup, progress, self.cancel.as_ref())
            }
        }
    }
}
