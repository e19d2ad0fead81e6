//! Restorable file installation fed by safe archive extraction.
//!
//! `restorable-core` overwrites files during an installation while keeping
//! the ability to undo every overwrite if the installation fails:
//!
//! - [`BackupStore`] moves each file out of the way before it is replaced,
//!   in place (`file.rbak`) when possible and into a temporary root
//!   otherwise, and can put everything back in reverse order.
//! - [`ExtractionEngine`] extracts ZIP archives with prefix remapping,
//!   include/exclude patterns and zip-slip rejection, routing overwrites
//!   through a `BackupStore`.
//! - [`TarReader`] enumerates and streams legacy tar and tar.gz archives.
//!
//! # Examples
//!
//! ```no_run
//! use restorable_core::BackupStore;
//! use restorable_core::ExtractionRequest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = BackupStore::default();
//! let result = ExtractionRequest::from_path("update.zip", "/opt/app")
//!     .include(["*.jar"])
//!     .backup(&mut store)
//!     .extract();
//!
//! match result {
//!     Ok(report) => {
//!         println!("Extracted {} files", report.files_extracted);
//!         store.discard()?;
//!     }
//!     Err(e) => {
//!         let restore = store.restore();
//!         eprintln!("installation failed ({e}), restored {} files", restore.restored.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod backup;
pub mod cancel;
pub mod config;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod formats;
pub mod inspection;
pub mod report;
pub mod security;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use api::extract_archive;
pub use backup::BackupRecord;
pub use backup::BackupStore;
pub use backup::RestoreFailure;
pub use backup::RestoreReport;
pub use cancel::CancellationToken;
pub use config::BackupConfig;
pub use config::ExtractionConfig;
pub use error::ExtractionError;
pub use error::Result;
pub use extraction::ExtractionEngine;
pub use extraction::ExtractionRequest;
pub use filter::Filter;
pub use filter::Pattern;
pub use filter::PatternSet;
pub use formats::TarEntry;
pub use formats::TarReader;
pub use inspection::ArchiveManifest;
pub use inspection::ManifestEntry;
pub use inspection::list_archive;
pub use report::ExtractionReport;
pub use report::ExtractionWarning;
pub use report::NoopProgress;
pub use report::ProgressCallback;

// Re-export types module for easier access
pub use types::DestDir;
pub use types::SafePath;
