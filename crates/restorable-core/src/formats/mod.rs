//! Archive format implementations.

pub mod compression;
pub mod detect;
pub mod tar;
pub mod zip;

pub use self::detect::ArchiveType;
pub use self::detect::detect_format;
pub use self::tar::TarEntry;
pub use self::tar::TarReader;
