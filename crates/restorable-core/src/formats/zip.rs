//! ZIP archive access.

use std::io;
use std::io::Read;
use std::io::Seek;
use std::time::SystemTime;

use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeZone;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::ExtractionError;
use crate::Result;

/// Summary of one ZIP entry, as shown by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntryInfo {
    /// Entry name exactly as stored.
    pub name: String,
    /// `true` for directory entries.
    pub is_dir: bool,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Modification time, interpreted in the local time zone.
    pub modified: Option<SystemTime>,
}

/// Opens a ZIP archive, mapping read failures to format errors.
pub fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(map_zip_error)
}

/// Lists every entry of a ZIP archive in central-directory order.
pub fn list_entries<R: Read + Seek>(reader: R) -> Result<Vec<ZipEntryInfo>> {
    let mut archive = open_archive(reader)?;
    (0..archive.len())
        .map(|i| {
            let file = archive.by_index(i).map_err(map_zip_error)?;
            Ok(ZipEntryInfo {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                size: file.size(),
                compressed_size: file.compressed_size(),
                modified: file.last_modified().and_then(to_system_time),
            })
        })
        .collect()
}

/// Converts a ZIP (MS-DOS) timestamp, which carries no zone, using the local
/// time zone.
pub fn to_system_time(time: zip::DateTime) -> Option<SystemTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )?;
    let naive = date.and_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(SystemTime::from(local))
}

pub(crate) fn map_zip_error(err: ZipError) -> ExtractionError {
    match err {
        ZipError::Io(e) if !matches!(
            e.kind(),
            io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData
        ) =>
        {
            ExtractionError::Io(e)
        }
        other => ExtractionError::InvalidArchive(other.to_string()),
    }
}
