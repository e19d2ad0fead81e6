//! Archive format detection by magic bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::compression::GZIP_MAGIC;
use crate::ExtractionError;
use crate::Result;

/// Local file header signature of a ZIP archive.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";

/// End-of-central-directory signature; an empty ZIP starts with it.
const ZIP_EMPTY_MAGIC: [u8; 4] = *b"PK\x05\x06";

/// Offset and value of the ustar magic inside a tar header.
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";

/// Bytes needed to tell every supported format apart.
const PROBE_LEN: usize = 512;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// ZIP archive.
    Zip,
}

impl ArchiveType {
    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// Detects the archive type of the file at `path` from its content.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if the file cannot be read and
/// `ExtractionError::InvalidArchive` if no supported format matches.
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    let mut probe = Vec::with_capacity(PROBE_LEN);
    File::open(path)?
        .take(PROBE_LEN as u64)
        .read_to_end(&mut probe)?;

    detect_bytes(&probe).ok_or_else(|| {
        ExtractionError::InvalidArchive(format!(
            "unrecognized archive format: {}",
            path.display()
        ))
    })
}

/// Detects the archive type from the leading bytes of an archive.
///
/// # Examples
///
/// ```
/// use restorable_core::formats::detect::detect_bytes;
/// use restorable_core::formats::detect::ArchiveType;
///
/// assert_eq!(detect_bytes(b"PK\x03\x04rest"), Some(ArchiveType::Zip));
/// assert_eq!(detect_bytes(&[0x1f, 0x8b, 0x08]), Some(ArchiveType::TarGz));
/// assert_eq!(detect_bytes(b"hello"), None);
/// ```
#[must_use]
pub fn detect_bytes(prefix: &[u8]) -> Option<ArchiveType> {
    if prefix.starts_with(&ZIP_MAGIC) || prefix.starts_with(&ZIP_EMPTY_MAGIC) {
        return Some(ArchiveType::Zip);
    }
    if prefix.starts_with(&GZIP_MAGIC) {
        return Some(ArchiveType::TarGz);
    }
    let ustar = prefix
        .get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len())
        .is_some_and(|m| m == USTAR_MAGIC);
    if ustar || super::tar::is_tar_header(prefix) {
        return Some(ArchiveType::Tar);
    }
    None
}
