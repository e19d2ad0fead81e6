//! Validated path wrappers for extraction.
//!
//! A [`SafePath`] can only be obtained by resolving an entry name against a
//! [`DestDir`], so every write the engine performs goes through containment
//! checking.

pub mod dest_dir;
pub mod safe_path;

pub use dest_dir::DestDir;
pub use safe_path::SafePath;
