//! Configuration for extraction and backup.

use std::path::PathBuf;

/// Selects which archive entries are extracted and where they land.
///
/// # Examples
///
/// ```
/// use restorable_core::ExtractionConfig;
///
/// // Extract everything
/// let config = ExtractionConfig::default();
///
/// // Extract only the jars below `plugins/`, leaving sources behind
/// let custom = ExtractionConfig::default()
///     .with_prefix(Some("plugins".to_string()))
///     .with_include(vec!["*.jar".to_string()])
///     .with_exclude(vec!["*.source.jar".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Path inside the archive used as the extraction root.
    ///
    /// Entries outside `prefix/` are dropped, the prefix is stripped from the
    /// rest. A blank prefix is the same as none.
    ///
    /// Default: `None`.
    pub prefix: Option<String>,

    /// Patterns an entry must match to be extracted (empty = every entry).
    ///
    /// Default: empty.
    pub include: Vec<String>,

    /// Patterns that reject an entry even if it was included.
    ///
    /// Default: empty.
    pub exclude: Vec<String>,
}

impl ExtractionConfig {
    /// Creates a new `ExtractionConfig` that extracts every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive path used as extraction root.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Sets the include patterns.
    #[must_use]
    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include = patterns;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Returns the prefix with surrounding separators removed, or `None` when
    /// it is unset or blank.
    #[must_use]
    pub fn effective_prefix(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .map(|p| p.trim().trim_matches('/'))
            .filter(|p| !p.is_empty())
    }
}

/// Where and how a [`BackupStore`](crate::BackupStore) keeps external backups.
///
/// # Examples
///
/// ```
/// use restorable_core::BackupConfig;
/// use std::path::PathBuf;
///
/// let config = BackupConfig::default()
///     .with_root(Some(PathBuf::from("/var/tmp")))
///     .with_prefix("myapp-");
/// ```
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Directory in which the external backup root is created.
    ///
    /// `None` uses the system temporary directory.
    ///
    /// Default: `None`.
    pub root: Option<PathBuf>,

    /// Prefix of the external backup root's directory name.
    ///
    /// Default: `"restorable-"`.
    pub prefix: String,

    /// Suffix of the external backup root's directory name.
    ///
    /// Default: `".backup"`.
    pub suffix: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            root: None,
            prefix: "restorable-".to_string(),
            suffix: ".backup".to_string(),
        }
    }
}

impl BackupConfig {
    /// Creates a new `BackupConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parent directory of the external backup root.
    #[must_use]
    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root;
        self
    }

    /// Sets the external backup root name prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the external backup root name suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Returns the directory in which the external root will be created.
    #[must_use]
    pub fn root_parent(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(std::env::temp_dir)
    }
}
