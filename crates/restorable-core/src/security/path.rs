//! Path traversal validation.

use crate::Result;
use crate::types::DestDir;
use crate::types::SafePath;

/// Validates that an archive entry name stays inside `dest`.
///
/// Delegates to [`SafePath::resolve`], which rejects absolute names, drive
/// prefixes, NUL bytes, `..` escapes and symlink escapes.
///
/// # Examples
///
/// ```no_run
/// use restorable_core::security::validate_path;
/// use restorable_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/opt/app")?;
///
/// let safe_path = validate_path("foo/bar.txt", &dest)?;
///
/// assert!(validate_path("../etc/passwd", &dest).is_err());
/// # Ok(())
/// # }
/// ```
pub fn validate_path(name: &str, dest: &DestDir) -> Result<SafePath> {
    SafePath::resolve(name, dest)
}
