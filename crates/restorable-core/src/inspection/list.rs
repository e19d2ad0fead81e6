//! Archive listing implementation.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::Result;
use crate::formats::ArchiveType;
use crate::formats::TarReader;
use crate::formats::detect_format;
use crate::formats::zip::list_entries;
use crate::inspection::manifest::ArchiveManifest;
use crate::inspection::manifest::ManifestEntry;

/// Lists archive contents without extracting.
///
/// Tar and tar.gz archives are read with [`TarReader`], ZIP archives through
/// their central directory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a supported,
/// readable archive.
pub fn list_archive<P: AsRef<Path>>(archive_path: P) -> Result<ArchiveManifest> {
    let archive_path = archive_path.as_ref();
    let format = detect_format(archive_path)?;

    match format {
        ArchiveType::Tar | ArchiveType::TarGz => list_tar(archive_path, format),
        ArchiveType::Zip => list_zip(archive_path),
    }
}

fn list_tar(archive_path: &Path, format: ArchiveType) -> Result<ArchiveManifest> {
    let mut reader = TarReader::open_path(archive_path)?;
    let mut manifest = ArchiveManifest::new(format);

    for entry in reader.entries() {
        let entry = entry?;
        manifest.push(ManifestEntry {
            name: entry.name,
            is_dir: entry.is_dir,
            size: entry.size,
            modified: Some(entry.mtime),
        });
    }

    Ok(manifest)
}

fn list_zip(archive_path: &Path) -> Result<ArchiveManifest> {
    let reader = BufReader::new(File::open(archive_path)?);
    let mut manifest = ArchiveManifest::new(ArchiveType::Zip);

    for entry in list_entries(reader)? {
        manifest.push(ManifestEntry {
            name: entry.name,
            is_dir: entry.is_dir,
            size: entry.size,
            modified: entry.modified,
        });
    }

    Ok(manifest)
}
