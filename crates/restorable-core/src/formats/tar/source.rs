//! Reopenable byte sources for tar archives.

use std::fs::File;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Something a [`TarReader`](super::TarReader) can open, and open again.
///
/// Reading an entry behind the cursor means starting over, so a source must
/// be able to hand out a fresh stream positioned at its first byte.
pub trait TarSource {
    /// Stream type produced by [`open`](Self::open).
    type Reader: Read;

    /// Opens a new stream at the start of the archive.
    fn open(&self) -> io::Result<Self::Reader>;
}

impl TarSource for PathBuf {
    type Reader = File;

    fn open(&self) -> io::Result<File> {
        File::open(self)
    }
}

impl TarSource for &Path {
    type Reader = File;

    fn open(&self) -> io::Result<File> {
        File::open(self)
    }
}

/// Archive bytes held in memory.
///
/// Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct MemorySource(Arc<[u8]>);

impl MemorySource {
    /// Wraps `bytes`.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the archive length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for MemorySource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl TarSource for MemorySource {
    type Reader = Cursor<Arc<[u8]>>;

    fn open(&self) -> io::Result<Self::Reader> {
        Ok(Cursor::new(Arc::clone(&self.0)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_reopens_at_start() {
        let source = MemorySource::from(b"abc".to_vec());
        let mut first = String::new();
        source.open().unwrap().read_to_string(&mut first).unwrap();
        let mut second = String::new();
        source.open().unwrap().read_to_string(&mut second).unwrap();
        assert_eq!(first, "abc");
        assert_eq!(second, "abc");
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_path_source_missing_file() {
        let source = PathBuf::from("/nonexistent/archive.tar");
        assert!(source.open().is_err());
    }
}
