//! Archive manifest types.

use std::time::SystemTime;

use crate::formats::ArchiveType;

/// Entries of an archive, in archive order.
#[derive(Debug, Clone)]
pub struct ArchiveManifest {
    /// Detected archive format.
    pub format: ArchiveType,
    /// Every entry, in archive order.
    pub entries: Vec<ManifestEntry>,
    /// Number of entries.
    pub total_entries: usize,
    /// Sum of uncompressed entry sizes.
    pub total_size: u64,
}

impl ArchiveManifest {
    /// Creates an empty manifest for `format`.
    #[must_use]
    pub const fn new(format: ArchiveType) -> Self {
        Self {
            format,
            entries: Vec::new(),
            total_entries: 0,
            total_size: 0,
        }
    }

    /// Appends `entry` and updates the totals.
    pub fn push(&mut self, entry: ManifestEntry) {
        self.total_entries += 1;
        self.total_size = self.total_size.saturating_add(entry.size);
        self.entries.push(entry);
    }
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Name as stored in the archive.
    pub name: String,
    /// `true` for directories.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Modification time, when the archive records one.
    pub modified: Option<SystemTime>,
}
