//! ZIP extraction into a destination directory.
//!
//! [`ExtractionEngine`] applies prefix remapping, include/exclude patterns and
//! containment checks to every entry, and routes overwrites of existing files
//! through an optional [`BackupStore`](crate::BackupStore) so a failed
//! installation can be rolled back. [`ExtractionRequest`] bundles the same
//! inputs behind a builder.

pub mod engine;
pub mod request;
pub mod stream;

pub use engine::ExtractionEngine;
pub use request::ExtractionRequest;
