//! Archive inspection without extraction.
//!
//! # Examples
//!
//! ```no_run
//! use restorable_core::list_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = list_archive("bundle.tar.gz")?;
//! println!("{} contains {} entries", manifest.format.name(), manifest.total_entries);
//! # Ok(())
//! # }
//! ```

pub mod list;
pub mod manifest;

pub use list::list_archive;
pub use manifest::ArchiveManifest;
pub use manifest::ManifestEntry;
